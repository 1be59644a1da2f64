pub mod state_sessions;
