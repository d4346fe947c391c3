//! ADIF import/export commands

use std::path::PathBuf;

use clap::Args;

use super::Context;
use hamlog::Result;

#[derive(Args)]
pub struct ImportArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn import(ctx: &Context, args: ImportArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.file).await?;
    // ADIF files in the wild are not always valid UTF-8
    let content = String::from_utf8_lossy(&bytes);

    let result = ctx.logbook.lock().await.import_adif(&content).await?;
    ctx.emit(&result, |r| {
        println!(
            "{} records, {} imported, {} errors",
            r.total_records, r.imported, r.errors
        );
        for msg in &r.error_messages {
            println!("  {}", msg);
        }
    })
}

pub async fn export(ctx: &Context, args: ExportArgs) -> Result<()> {
    let (document, count) = {
        let book = ctx.logbook.lock().await;
        (book.export_adif()?, book.contacts().len())
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &document).await?;
            log::info!("Exported {} contacts to {}", count, path.display());
        }
        None => print!("{}", document),
    }
    Ok(())
}
