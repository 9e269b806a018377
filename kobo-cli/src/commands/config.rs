//! Config command - view and change settings.json

use anyhow::Result;
use clap::Subcommand;
use kobo_core::config::Config;

use super::get_kobo_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Persist one setting, e.g. `kobo config set paystack.country ghana`
    Set { key: String, value: String },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let kobo_dir = get_kobo_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&kobo_dir)?;
            let pairs = config.display_pairs();
            if json {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v)))
                    .collect();
                return output::json(map);
            }

            let mut table = output::create_table();
            table.set_header(vec!["Key", "Value"]);
            for (key, value) in pairs {
                table.add_row(vec![key.to_string(), value]);
            }
            println!("{}", table);
            println!("Environment variables override the file for URLs and the secret key.");
        }
        ConfigCommands::Set { key, value } => {
            Config::set_value(&kobo_dir, &key, &value)?;
            output::success(&format!("{} = {}", key, value));
        }
    }

    Ok(())
}
