use serde::{Deserialize, Serialize};

/// Storage plan of the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPlan {
    pub name: String,
    pub limit_gb: f64,
    pub used_gb: f64,
    pub is_active: bool,
}

impl Default for UserPlan {
    fn default() -> Self {
        Self {
            name: "Pro Plan".to_string(),
            limit_gb: 10.0,
            used_gb: 7.5,
            is_active: true,
        }
    }
}

impl UserPlan {
    /// Monthly storage used, as a whole percentage in 0..=100.
    pub fn usage_percent(&self) -> u8 {
        if self.limit_gb <= 0.0 {
            return 100;
        }
        let pct = (self.used_gb / self.limit_gb * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_percent() {
        assert_eq!(UserPlan::default().usage_percent(), 75);

        let over = UserPlan { used_gb: 12.0, ..UserPlan::default() };
        assert_eq!(over.usage_percent(), 100);

        let empty = UserPlan { limit_gb: 0.0, ..UserPlan::default() };
        assert_eq!(empty.usage_percent(), 100);
    }
}
