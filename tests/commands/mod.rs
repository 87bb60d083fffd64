//! Command-level tests

mod test_fetch;
mod test_filter;
mod test_jsonl;
