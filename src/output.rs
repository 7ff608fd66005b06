//! Human-facing console lines, separate from `tracing` logs

use std::net::SocketAddr;
use std::sync::OnceLock;

/// Set to `1` or `true` to suppress the startup banner
pub const QUIET_ENV: &str = "EVENTGRAPH_QUIET";

static QUIET: OnceLock<bool> = OnceLock::new();

fn parse_quiet(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some(v) => v == "1" || v.eq_ignore_ascii_case("true"),
        None => false,
    }
}

/// Read once from the environment and cached for the process
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| parse_quiet(std::env::var(QUIET_ENV).ok().as_deref()))
}

/// Startup line pointing at the GraphQL endpoint (and Playground, when served)
pub fn server_banner(addr: SocketAddr, playground: bool) -> String {
    let mut line = format!("🚀 GraphQL server running at http://{}", addr);
    if playground {
        line.push_str(" (Playground on GET /)");
    }
    line
}

/// Print the startup banner unless quiet
pub fn announce_server(addr: SocketAddr, playground: bool) {
    if !is_quiet() {
        println!("{}", server_banner(addr, playground));
    }
}
