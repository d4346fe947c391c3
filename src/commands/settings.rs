//! Settings commands

use clap::{Args, Subcommand};

use super::Context;
use hamlog::error::Error;
use hamlog::Result;

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: Option<SettingsCommand>,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show all settings (API key masked)
    Show,
    /// Print one setting
    Get { key: String },
    /// Change one setting, e.g. `settings set my-locator JN45ol`
    Set { key: String, value: String },
}

pub async fn run(ctx: &Context, args: SettingsArgs) -> Result<()> {
    match args.command.unwrap_or(SettingsCommand::Show) {
        SettingsCommand::Show => {
            let settings = ctx.logbook.lock().await.settings().redacted();
            ctx.emit(&settings, |s| {
                println!("my-call             {}", s.my_call);
                println!("api-key             {}", s.api_key);
                println!("my-locator          {}", s.my_locator);
                println!("parks-enabled       {}", s.parks_enabled);
                println!("summits-enabled     {}", s.summits_enabled);
                println!("spots-enabled       {}", s.spots_enabled);
                println!("refresh-interval    {}", s.refresh_interval_secs);
                println!("audio-recording     {}", s.audio_recording_enabled);
                println!("auto-sync           {}", s.auto_sync_enabled);
                println!("reference-threshold {}", s.reference_threshold_deg);
                println!("provider-timeout    {}", s.provider_timeout_secs);
            })
        }
        SettingsCommand::Get { key } => {
            let value = ctx
                .logbook
                .lock()
                .await
                .settings()
                .get(&key)
                .ok_or_else(|| Error::Config(format!("unknown setting '{}'", key)))?;
            ctx.emit(&value, |v| println!("{}", v))
        }
        SettingsCommand::Set { key, value } => {
            let mut book = ctx.logbook.lock().await;
            let mut settings = book.settings().clone();
            settings.set(&key, &value)?;
            book.update_settings(settings).await?;
            log::info!("Setting {} updated", key);
            Ok(())
        }
    }
}
