use clap::Subcommand;

use super::AppContext;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file and storage locations
    Path,
    /// Get a value by dot-separated key (e.g. display.accent_color)
    Get { key: String },
}

pub fn run(ctx: &AppContext, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            print!("{}", ctx.explicit_config()?.to_toml_string()?);
        }
        ConfigAction::Path => {
            println!("config = {}", ctx.config_path.display());
            println!("{}", toml::to_string_pretty(&ctx.paths)?);
        }
        ConfigAction::Get { key } => match ctx.explicit_config()?.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown or unset config key: {key}").into()),
        },
    }
    Ok(())
}
