#[allow(clippy::module_inception)]
pub mod utils;

#[cfg(test)]
pub mod test_utils;
