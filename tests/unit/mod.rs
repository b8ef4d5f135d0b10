/// Unit tests for the habit entity and its value objects
mod domain_tests;
