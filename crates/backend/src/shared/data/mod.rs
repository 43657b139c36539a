pub mod db;
pub mod seed;

#[cfg(test)]
pub mod test_support;
