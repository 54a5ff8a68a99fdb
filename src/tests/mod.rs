pub mod common;

#[cfg(test)]
mod test_delibirdy;
