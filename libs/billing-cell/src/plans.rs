use serde::Serialize;

/// Feature matrix attached to each subscription tier.
#[derive(Debug, Clone, Serialize)]
pub struct PlanFeatures {
    pub max_patients: Option<u32>,
    pub medical_records: bool,
    pub appointments: bool,
    pub assistant: bool,
    pub mental_health_helper: bool,
    pub doctor_search: bool,
    pub priority_support: bool,
    pub api_access: bool,
    pub max_storage_gb: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Monthly price; None means custom pricing.
    pub price: Option<f64>,
    pub currency: &'static str,
    pub billing_cycle: &'static str,
    pub features: PlanFeatures,
}

pub fn all_plans() -> Vec<Plan> {
    vec![
        Plan {
            id: "plan_freemium_practia",
            name: "Freemium",
            description: "Free tier for trying the platform",
            price: Some(0.0),
            currency: "MXN",
            billing_cycle: "monthly",
            features: PlanFeatures {
                max_patients: Some(5),
                medical_records: true,
                appointments: true,
                assistant: false,
                mental_health_helper: false,
                doctor_search: false,
                priority_support: false,
                api_access: false,
                max_storage_gb: Some(1),
            },
        },
        Plan {
            id: "plan_basico_practia",
            name: "Básico",
            description: "Essentials for independent doctors",
            price: Some(199.0),
            currency: "MXN",
            billing_cycle: "monthly",
            features: PlanFeatures {
                max_patients: Some(50),
                medical_records: true,
                appointments: true,
                assistant: true,
                mental_health_helper: true,
                doctor_search: true,
                priority_support: false,
                api_access: false,
                max_storage_gb: Some(10),
            },
        },
        Plan {
            id: "plan_premium_practia",
            name: "Premium",
            description: "Full feature set with priority support",
            price: Some(499.0),
            currency: "MXN",
            billing_cycle: "monthly",
            features: PlanFeatures {
                max_patients: Some(200),
                medical_records: true,
                appointments: true,
                assistant: true,
                mental_health_helper: true,
                doctor_search: true,
                priority_support: true,
                api_access: false,
                max_storage_gb: Some(100),
            },
        },
        Plan {
            id: "plan_empresarial_practia",
            name: "Empresarial",
            description: "Custom plan for clinics and hospital networks",
            price: None,
            currency: "MXN",
            billing_cycle: "annual",
            features: PlanFeatures {
                max_patients: None,
                medical_records: true,
                appointments: true,
                assistant: true,
                mental_health_helper: true,
                doctor_search: true,
                priority_support: true,
                api_access: true,
                max_storage_gb: None,
            },
        },
    ]
}

pub fn plan_by_id(plan_id: &str) -> Option<Plan> {
    all_plans().into_iter().find(|p| p.id == plan_id)
}

pub fn plan_by_name(name: &str) -> Option<Plan> {
    let name = name.to_lowercase();
    all_plans()
        .into_iter()
        .find(|p| p.name.to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookups() {
        assert_eq!(plan_by_id("plan_basico_practia").unwrap().name, "Básico");
        assert!(plan_by_id("plan_unknown").is_none());
        assert_eq!(plan_by_name("premium").unwrap().price, Some(499.0));
    }

    #[test]
    fn freemium_has_no_assistant_access() {
        let plan = plan_by_name("freemium").unwrap();
        assert!(!plan.features.assistant);
        assert_eq!(plan.features.max_patients, Some(5));
    }

    #[test]
    fn enterprise_is_custom_priced_and_unlimited() {
        let plan = plan_by_name("empresarial").unwrap();
        assert!(plan.price.is_none());
        assert!(plan.features.max_patients.is_none());
        assert!(plan.features.api_access);
    }
}
