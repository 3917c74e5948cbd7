use super::Ctx;
use helpdesk_server::state::AppState;

pub fn run(ctx: &Ctx, port: u16, no_open: bool) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let root = ctx.root.clone();
    let fixed_now = ctx.fixed_now;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!(
            "Helpdesk '{}' → http://localhost:{actual_port}",
            config.helpdesk.name
        );

        // Built inside the runtime so the ticket file watcher starts.
        let mut state = AppState::new(root);
        if let Some(now) = fixed_now {
            state = state.with_fixed_now(now);
        }

        tokio::select! {
            res = helpdesk_server::serve_on(state, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
