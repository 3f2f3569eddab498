#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;
pub(crate) mod json;

pub(crate) use db::{must_create_test_connection, must_create_test_state};
pub(crate) use http::{assert_content_type, get_header};
pub(crate) use json::parse_json_body;
