use chrono::Local;
use solvestreak_core::{emit_last_known, HistoryStore, OutputSink, UpdatePipeline};

use super::AppContext;

pub fn run(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let mut sink = OutputSink::stdout(ctx.paths.clone(), ctx.config.output_mode);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            tracing::error!(error = %err, "could not start async runtime, showing last-known stats");
            let store = HistoryStore::new(&ctx.paths.history);
            emit_last_known(&store, &mut sink, &Local::now(), &ctx.config)?;
            return Ok(());
        }
    };

    let pipeline = UpdatePipeline::new(ctx.config.clone(), &ctx.paths);
    runtime.block_on(pipeline.run_or_fallback(&mut sink, Local::now));
    Ok(())
}
