pub mod capture_session;
pub mod payload;

#[cfg(test)]
mod tests;
