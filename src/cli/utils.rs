/*-------------------------------------------------------------------------------------------------
  Utility Functions
-------------------------------------------------------------------------------------------------*/

pub fn to_lowercase<const COUNT: usize>(value: &str, exceptions: [&str; COUNT]) -> String {
    let lower = value.to_lowercase();
    let upper = value.to_uppercase();

    if exceptions.contains(&upper.as_str()) {
        upper
    } else {
        lower
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_lowercase() {
        assert_eq!(to_lowercase("US-West-2", ["GLOBAL"]), "us-west-2");
        assert_eq!(to_lowercase("global", ["GLOBAL"]), "GLOBAL");
    }
}
