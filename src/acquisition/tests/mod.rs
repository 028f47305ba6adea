mod capture_session_test;
mod payload_test;
