use clap::Subcommand;
use collview_store::{KeyringStore, LocalStore, TOKEN_KEY};

#[derive(Subcommand)]
pub enum TokenAction {
    /// Store the bearer token sent with API requests
    Set {
        /// API token (will prompt if not provided)
        token: Option<String>,
    },
    /// Show whether a token is stored
    Status,
    /// Remove the stored token
    Clear,
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{visible}")
}

pub fn run(action: TokenAction) -> anyhow::Result<()> {
    let store = KeyringStore::new();

    match action {
        TokenAction::Set { token } => {
            let token = match token {
                Some(t) => t,
                None => {
                    eprint!("Enter API token: ");
                    let mut input = String::new();
                    std::io::stdin().read_line(&mut input)?;
                    input.trim().to_string()
                }
            };

            if token.is_empty() {
                anyhow::bail!("Token cannot be empty");
            }

            store.store(TOKEN_KEY, &token)?;
            println!("Token stored in OS keychain ({})", mask(&token));
            Ok(())
        }
        TokenAction::Status => {
            match store.get(TOKEN_KEY)? {
                Some(token) => println!("Token stored ({})", mask(&token)),
                None => println!("No token stored; requests are sent unauthenticated"),
            }
            Ok(())
        }
        TokenAction::Clear => {
            store.delete(TOKEN_KEY)?;
            println!("Token removed");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask("abcdef123456"), "****3456");
        assert_eq!(mask("ab"), "****ab");
    }
}
