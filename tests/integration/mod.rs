/// Integration tests covering storage adapters and the tool handlers
mod storage_tests;
mod workflow_tests;
