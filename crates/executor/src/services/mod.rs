pub mod dry_run_broker;
pub mod system_clock;
