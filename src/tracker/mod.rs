pub mod accumulator;
pub mod clock;
pub mod identity;
pub mod monitor;

#[cfg(test)]
pub mod test_support;
