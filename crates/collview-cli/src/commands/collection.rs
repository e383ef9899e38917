use std::sync::Arc;

use clap::Args;

use collview_api::{create_transport, CollectionRepository};
use collview_core::models::collection::{Collection, CollectionDraft};
use collview_store::KeyringStore;
use collview_viewer::render::format_timestamp;

use super::GlobalOpts;

#[derive(Args)]
pub struct CreateArgs {
    /// Collection name
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    /// CSS color for the card swatch (e.g. "#3b82f6")
    #[arg(long)]
    color: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Collection id
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    color: Option<String>,
}

fn repository(global: &GlobalOpts) -> anyhow::Result<CollectionRepository> {
    let config = global.config()?;
    let transport = create_transport(&config, Arc::new(KeyringStore::new()))?;
    Ok(CollectionRepository::new(transport))
}

fn print_collection(c: &Collection) {
    println!("ID:             {}", c.id);
    println!("Name:           {}", c.name);
    println!("Description:    {}", c.description);
    println!("Color:          {}", c.color);
    println!("Documents:      {}", c.document_count);
    if let Some(sessions) = c.chat_session_count {
        println!("Chat sessions:  {sessions}");
    }
    println!("Created:        {}", format_timestamp(c.created(), &c.created_at));
    println!("Updated:        {}", format_timestamp(c.updated(), &c.updated_at));
}

pub async fn show(id: &str, global: &GlobalOpts) -> anyhow::Result<()> {
    let collection = repository(global)?.find_by_id(id).await?;
    print_collection(&collection);
    Ok(())
}

pub async fn create(args: CreateArgs, global: &GlobalOpts) -> anyhow::Result<()> {
    let draft = CollectionDraft {
        name: Some(args.name),
        description: args.description,
        color: args.color,
    };
    let created = repository(global)?.create(&draft).await?;
    println!("Collection '{}' created", created.name);
    print_collection(&created);
    Ok(())
}

pub async fn update(args: UpdateArgs, global: &GlobalOpts) -> anyhow::Result<()> {
    let draft = CollectionDraft {
        name: args.name,
        description: args.description,
        color: args.color,
    };
    if draft.is_empty() {
        anyhow::bail!("Nothing to update: pass --name, --description or --color");
    }
    let updated = repository(global)?.update(&args.id, &draft).await?;
    println!("Collection '{}' updated", updated.name);
    print_collection(&updated);
    Ok(())
}

pub async fn delete(id: &str, global: &GlobalOpts) -> anyhow::Result<()> {
    repository(global)?.delete(id).await?;
    println!("Collection '{id}' deleted");
    Ok(())
}
