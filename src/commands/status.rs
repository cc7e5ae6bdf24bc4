use anyhow::Result;

use crate::Context;
use crate::ui;

/// `status`: show every tracked resource
pub fn run(ctx: &Context) -> Result<()> {
    ui::section("📊 Resource Status");

    let tracker = ctx.tracker();
    let state = tracker.load();

    ui::resource_table(&state);

    if ctx.verbose > 0 {
        ui::kv("State file", &tracker.state_file().display().to_string());
        match tracker.remote() {
            Some(remote) => ui::kv("Remote", &remote.uri()),
            None => ui::kv("Remote", "disabled"),
        }
    }

    Ok(())
}
