//! Text rendering of the viewer's states.

use chrono::NaiveDateTime;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use collview_core::models::collection::Collection;
use collview_core::models::theme::Theme;

use crate::state::View;

/// Width one card needs, borders included.
pub const CARD_WIDTH: u16 = 38;

const SPINNER: &str = "⠋";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    /// Available terminal columns.
    pub width: u16,
    /// Emit ANSI colors. Off gives plain, deterministic text.
    pub styled: bool,
    /// Recovery action offered by the error view.
    pub reload_hint: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            width: 100,
            styled: false,
            reload_hint: "Press r to reload".to_string(),
        }
    }
}

/// Format a parsed timestamp as `Oct 28, 2025, 10:29 AM`, falling back to
/// the raw server value when it did not parse.
pub fn format_timestamp(parsed: Option<NaiveDateTime>, raw: &str) -> String {
    parsed
        .map(|dt| dt.format("%b %-d, %Y, %-I:%M %p").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Parse a CSS color: `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a basic name.
pub fn parse_css_color(css: &str) -> Option<Color> {
    let css = css.trim().to_lowercase();

    if let Some(hex) = css.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        return Some(Color::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }

    if let Some(inner) = css.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<u8> = inner
            .split(',')
            .map(|p| p.trim().parse().ok())
            .collect::<Option<_>>()?;
        if let [r, g, b] = parts[..] {
            return Some(Color::Rgb { r, g, b });
        }
        return None;
    }

    match css.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "yellow" => Some(Color::Yellow),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "gray" | "grey" => Some(Color::Grey),
        "orange" => Some(Color::Rgb { r: 255, g: 165, b: 0 }),
        "purple" => Some(Color::Rgb { r: 128, g: 0, b: 128 }),
        _ => None,
    }
}

/// One collection's card content.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    /// The collection's color as sent by the server.
    pub color: String,
    pub swatch: Option<Color>,
    pub lines: Vec<String>,
}

impl Card {
    pub fn from_collection(c: &Collection) -> Self {
        // Empty descriptions still take a line so cards in a row line up.
        let mut lines = vec![c.description.clone()];
        lines.push(format!("Documents: {}", c.document_count));
        if let Some(sessions) = c.chat_session_count {
            lines.push(format!("Chat sessions: {sessions}"));
        }
        lines.push(format!("Created: {}", format_timestamp(c.created(), &c.created_at)));
        lines.push(format!("Updated: {}", format_timestamp(c.updated(), &c.updated_at)));

        Self {
            title: c.name.clone(),
            color: c.color.clone(),
            swatch: parse_css_color(&c.color),
            lines,
        }
    }

    /// Title line. Styled output paints the glyph in the collection's color;
    /// plain output spells the color out instead.
    fn heading(&self, opts: &RenderOptions) -> String {
        match (opts.styled, self.swatch) {
            (true, Some(swatch)) => {
                let glyph = console::Style::new()
                    .fg(console_color(swatch))
                    .force_styling(true)
                    .apply_to("■");
                format!("{glyph} {}", self.title)
            }
            (true, None) => format!("■ {}", self.title),
            (false, _) => format!("■ {}  {}", self.title, self.color),
        }
    }

    fn text(&self, opts: &RenderOptions) -> String {
        let mut out = self.heading(opts);
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

pub fn cards(collections: &[Collection]) -> Vec<Card> {
    collections.iter().map(Card::from_collection).collect()
}

/// How many cards fit side by side.
pub fn columns_for(width: u16) -> usize {
    usize::from((width / CARD_WIDTH).max(1))
}

fn text_color(theme: Theme) -> Color {
    match theme {
        Theme::Light => Color::Black,
        Theme::Dark => Color::White,
    }
}

/// Nearest terminal color for a swatch. Truecolor values go through the
/// 256-color cube.
fn console_color(color: Color) -> console::Color {
    match color {
        Color::Black => console::Color::Black,
        Color::Red | Color::DarkRed => console::Color::Red,
        Color::Green | Color::DarkGreen => console::Color::Green,
        Color::Yellow | Color::DarkYellow => console::Color::Yellow,
        Color::Blue | Color::DarkBlue => console::Color::Blue,
        Color::Magenta | Color::DarkMagenta => console::Color::Magenta,
        Color::Cyan | Color::DarkCyan => console::Color::Cyan,
        Color::Grey | Color::DarkGrey => console::Color::Color256(8),
        Color::AnsiValue(v) => console::Color::Color256(v),
        Color::Rgb { r, g, b } => {
            let level = |c: u8| (u16::from(c) * 5 + 127) / 255;
            let index = 16 + 36 * level(r) + 6 * level(g) + level(b);
            console::Color::Color256(index as u8)
        }
        Color::White | Color::Reset => console::Color::White,
    }
}

fn accent(theme: Theme) -> console::Style {
    match theme {
        Theme::Light => console::Style::new().blue().bold(),
        Theme::Dark => console::Style::new().cyan().bold(),
    }
}

fn paint(text: &str, style: console::Style, opts: &RenderOptions) -> String {
    if opts.styled {
        style.force_styling(true).apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

fn grid(cards: &[Card], opts: &RenderOptions) -> String {
    let columns = columns_for(opts.width).min(cards.len()).max(1);

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(opts.width);
    if opts.styled {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    for row in cards.chunks(columns) {
        let mut cells: Vec<Cell> = row
            .iter()
            .map(|card| Cell::new(card.text(opts)).fg(text_color(opts.theme)))
            .collect();
        cells.resize_with(columns, || Cell::new(""));
        table.add_row(cells);
    }

    table.to_string()
}

/// Render a view as terminal text.
pub fn render(view: &View<'_>, opts: &RenderOptions) -> String {
    match view {
        View::Loading => format!("{SPINNER} Loading collections..."),
        View::Error { message } => {
            let title = paint("Error loading collections", console::Style::new().red().bold(), opts);
            format!("{title}\n{message}\n\n{}", opts.reload_hint)
        }
        View::Empty => {
            let title = paint("No collections found", accent(opts.theme), opts);
            format!("{title}\nCollections you create will show up here.")
        }
        View::Populated(collections) => {
            let header = paint(
                &format!("Collections ({})", collections.len()),
                accent(opts.theme),
                opts,
            );
            format!("{header}\n{}", grid(&cards(collections), opts))
        }
    }
}
