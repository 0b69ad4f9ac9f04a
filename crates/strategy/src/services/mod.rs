pub mod date_window;
pub mod decision_engine;
pub mod order_builder;
pub mod position_sizer;
pub mod position_state;
pub mod sentiment_gate;
