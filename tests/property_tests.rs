// Property-based tests for the grid codec and reschedule calculator

mod property;
