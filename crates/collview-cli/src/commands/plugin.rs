use clap::Subcommand;
use comfy_table::Table;
use collview_core::models::plugin::PluginManifest;

#[derive(Subcommand)]
pub enum PluginAction {
    /// Show the plugin and module metadata a host registers
    Info {
        /// Print the manifest as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PluginAction) -> anyhow::Result<()> {
    match action {
        PluginAction::Info { json } => {
            let manifest = PluginManifest::collection_viewer();
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
                return Ok(());
            }

            let plugin = &manifest.plugin;
            println!("Name:         {}", plugin.name);
            println!("Version:      {}", plugin.version);
            println!("Description:  {}", plugin.description);
            println!("Category:     {}", plugin.category);
            println!("Bundle:       {} ({})", plugin.bundle_location, plugin.bundle_method);
            println!("Permissions:  {}", plugin.permissions.join(", "));

            let mut table = Table::new();
            table.set_header(vec!["MODULE", "DISPLAY NAME", "PRIORITY", "MIN SIZE", "DEFAULT SIZE", "TAGS"]);
            for module in &manifest.modules {
                let layout = module.layout;
                table.add_row(vec![
                    module.name.clone(),
                    module.display_name.clone(),
                    module.priority.to_string(),
                    format!("{}x{}", layout.min_width, layout.min_height),
                    format!("{}x{}", layout.default_width, layout.default_height),
                    module.tags.join(", "),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}
