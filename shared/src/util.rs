/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_millis_is_plausible() {
        // 2024-01-01 00:00:00 UTC as a lower bound
        assert!(now_millis() > 1_704_067_200_000);
    }
}
