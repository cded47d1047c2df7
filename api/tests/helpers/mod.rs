
pub use app::{bearer, make_test_app, read_json, seed};
pub use ws::{connect_ws, spawn_server};
