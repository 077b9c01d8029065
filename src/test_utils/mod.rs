#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;

pub(crate) use db::{create_test_user, get_test_connection};
pub(crate) use form::{assert_form_action, assert_form_input};
pub(crate) use html::{assert_valid_html, parse_html_document};
