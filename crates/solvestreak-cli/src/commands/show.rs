use chrono::Local;
use solvestreak_core::{emit_last_known, HistoryStore, OutputSink, Snapshot};

use super::AppContext;

pub fn run(ctx: &AppContext, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = HistoryStore::new(&ctx.paths.history);

    if json {
        let snapshot = Snapshot::build(&store.load(), &Local::now(), &ctx.config.display);
        println!("{}", serde_json::to_string_pretty(&snapshot.structured())?);
        return Ok(());
    }

    let mut sink = OutputSink::stdout(ctx.paths.clone(), ctx.config.output_mode);
    emit_last_known(&store, &mut sink, &Local::now(), &ctx.config)?;
    Ok(())
}
