use crate::cli::GlobalFlags;
use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;

/// Handle `avault serve`.
pub fn handle(args: &ServeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let bind = args.bind.as_deref().unwrap_or(&ctx.config.server.bind);
    if !flags.quiet {
        eprintln!("Serving http://{bind}/api/items (Ctrl-C to stop)");
    }
    crate::serve::run(&ctx.service, bind)
}
