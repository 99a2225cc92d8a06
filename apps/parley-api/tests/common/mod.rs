use std::net::SocketAddr;

use parley_api::config::Config;
use parley_api::gateway::presence::Dice;
use parley_api::AppState;

/// Deterministic random source: every roll lands the same way.
pub struct FixedDice(pub bool);

impl Dice for FixedDice {
    fn roll(&self, _p: f64) -> bool {
        self.0
    }
}

/// Start the full router on an ephemeral port with pinned presence dice.
/// The server runs in the background; returns the bound address and the
/// shared state so tests can inspect it directly.
pub async fn start_server(dice_online: bool) -> (SocketAddr, AppState) {
    let state = AppState::with_dice(Config::default(), Box::new(FixedDice(dice_online)));
    let app = parley_api::routes::router().with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}
