pub mod logger;
pub mod state_machine;

#[cfg(test)]
pub mod http_stub;
