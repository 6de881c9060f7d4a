use serde::{Deserialize, Serialize};

use super::format::display_date;
use super::Badge;
use crate::auth::validate::{non_empty, validate_email, validate_required, MIN_PASSWORD_LEN};
use crate::paging::{Choice, RecordFilter, SearchTerm};

/// Billing cadence, derived from the free-form plan name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanKind {
    Monthly,
    Annual,
    Other,
}

impl PlanKind {
    /// "Premium" plans bill annually and "Basic" plans monthly.
    pub fn classify(plan: &str) -> PlanKind {
        let lower = plan.to_lowercase();
        if lower.contains("annual") || lower.contains("premium") {
            PlanKind::Annual
        } else if lower.contains("monthly") || lower.contains("basic") {
            PlanKind::Monthly
        } else {
            PlanKind::Other
        }
    }

    pub fn param(self) -> &'static str {
        match self {
            PlanKind::Monthly => "monthly",
            PlanKind::Annual => "annual",
            PlanKind::Other => "other",
        }
    }
}

pub const PLAN_OPTIONS: &[(&str, &str)] = &[("monthly", "Monthly"), ("annual", "Annual")];
pub const ACTIVE_OPTIONS: &[(&str, &str)] = &[("active", "Active"), ("inactive", "Inactive")];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Institute {
    pub institute_id: String,
    pub institute_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub institute_type: Option<String>,
    #[serde(default)]
    pub student_count: i64,
    #[serde(default)]
    pub subscription_plan: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
}

impl Institute {
    pub fn plan(&self) -> PlanKind {
        PlanKind::classify(&self.subscription_plan)
    }
}

/// `active`/`inactive` drop-down shared by the institute and user tables.
pub fn accepts_active(choice: &Choice, is_active: bool) -> bool {
    match choice {
        Choice::Any => true,
        Choice::Exactly(v) if v == "active" => is_active,
        Choice::Exactly(v) if v == "inactive" => !is_active,
        Choice::Exactly(_) => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstituteFilter {
    pub search: SearchTerm,
    pub plan: Choice,
    pub active: Choice,
}

impl InstituteFilter {
    pub fn new(search: &str, plan: &str, active: &str) -> Self {
        InstituteFilter {
            search: SearchTerm::new(search),
            plan: Choice::from_param(plan),
            active: Choice::from_param(active),
        }
    }
}

impl RecordFilter<Institute> for InstituteFilter {
    fn matches(&self, i: &Institute) -> bool {
        let fields = [Some(i.institute_name.as_str()), i.email.as_deref(), i.contact_person.as_deref()];
        self.search.matches_any(fields.into_iter().flatten())
            && self.plan.accepts(i.plan().param())
            && accepts_active(&self.active, i.is_active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstituteCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub monthly: usize,
    pub annual: usize,
}

impl InstituteCounts {
    pub fn from_list(list: &[Institute]) -> Self {
        let active = list.iter().filter(|i| i.is_active).count();
        InstituteCounts {
            total: list.len(),
            active,
            inactive: list.len() - active,
            monthly: list.iter().filter(|i| i.plan() == PlanKind::Monthly).count(),
            annual: list.iter().filter(|i| i.plan() == PlanKind::Annual).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstituteRow {
    pub institute_id: String,
    pub institute_name: String,
    pub contact: String,
    pub email: String,
    pub students: i64,
    pub plan: Badge,
    pub status: Badge,
    pub created: String,
    pub toggle_label: &'static str,
    pub is_active: bool,
}

impl From<&Institute> for InstituteRow {
    fn from(i: &Institute) -> Self {
        let plan = match i.plan() {
            PlanKind::Annual => Badge::new("Annual", "badge-purple"),
            PlanKind::Monthly => Badge::new("Monthly", "badge-info"),
            PlanKind::Other if i.subscription_plan.is_empty() => Badge::new("N/A", "badge-muted"),
            PlanKind::Other => Badge::new(i.subscription_plan.clone(), "badge-muted"),
        };
        InstituteRow {
            institute_id: i.institute_id.clone(),
            institute_name: i.institute_name.clone(),
            contact: i.contact_person.clone().unwrap_or_else(|| "-".to_string()),
            email: i.email.clone().unwrap_or_else(|| "-".to_string()),
            students: i.student_count,
            plan,
            status: if i.is_active {
                Badge::new("Active", "badge-success")
            } else {
                Badge::new("Inactive", "badge-danger")
            },
            created: i.created_at.as_deref().map(display_date).unwrap_or_else(|| "-".to_string()),
            toggle_label: if i.is_active { "Deactivate" } else { "Activate" },
            is_active: i.is_active,
        }
    }
}

pub const INSTITUTE_TYPES: &[(&str, &str)] = &[
    ("University", "University"),
    ("College", "College"),
    ("School", "School"),
    ("Coaching", "Coaching Center"),
    ("Other", "Other"),
];

pub const SUBSCRIPTION_PLANS: &[(&str, &str)] = &[
    ("Monthly", "Monthly"),
    ("Annual", "Annual"),
    ("Basic", "Basic"),
    ("Premium", "Premium"),
];

pub const PAYMENT_METHODS: &[(&str, &str)] = &[
    ("Credit Card", "Credit Card"),
    ("Debit Card", "Debit Card"),
    ("Net Banking", "Net Banking"),
    ("UPI", "UPI"),
    ("Cash", "Cash"),
];

fn listed(pairs: &[(&str, &str)], value: &str) -> bool {
    pairs.iter().any(|(v, _)| *v == value)
}

/// Full record of `GET /institutes/{id}`, used to fill the edit form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InstituteDetail {
    pub institute_id: String,
    pub institute_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub institute_type: String,
    #[serde(default)]
    pub student_count: i64,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub subscription_plan: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Create/edit form. The id and password are only used on create.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InstituteForm {
    #[serde(default)]
    pub institute_id: String,
    #[serde(default)]
    pub institute_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub institute_type: String,
    #[serde(default)]
    pub student_count: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub subscription_plan: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Body of `POST /institutes/register`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstitute {
    pub institute_id: String,
    pub institute_name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub institute_type: String,
    pub student_count: i64,
    pub contact_person: String,
    pub subscription_plan: String,
    pub payment_method: String,
    pub password: String,
}

/// Body of `PUT /institutes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstituteUpdate {
    pub institute_name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub institute_type: String,
    pub student_count: i64,
    pub contact_person: String,
    pub subscription_plan: String,
    pub payment_method: Option<String>,
}

/// Checked fields common to create and edit.
struct InstituteFields {
    institute_name: String,
    address: String,
    email: String,
    phone: String,
    institute_type: String,
    student_count: i64,
    contact_person: String,
    subscription_plan: String,
    payment_method: Option<String>,
}

impl InstituteForm {
    pub fn from_detail(d: &InstituteDetail) -> Self {
        InstituteForm {
            institute_id: d.institute_id.clone(),
            institute_name: d.institute_name.clone(),
            address: d.address.clone(),
            email: d.email.clone(),
            phone: d.phone.clone(),
            institute_type: d.institute_type.clone(),
            student_count: d.student_count.to_string(),
            contact_person: d.contact_person.clone(),
            subscription_plan: d.subscription_plan.clone().unwrap_or_default(),
            payment_method: d.payment_method.clone().unwrap_or_default(),
            password: String::new(),
            csrf_token: String::new(),
        }
    }

    fn check_fields(&self, errors: &mut Vec<String>) -> Option<InstituteFields> {
        errors.extend(
            [
                validate_required(&self.institute_name, "Institute name", 200),
                validate_required(&self.address, "Address", 500),
                validate_email(&self.email),
                validate_required(&self.phone, "Phone", 20),
                validate_required(&self.contact_person, "Contact person", 100),
            ]
            .into_iter()
            .flatten(),
        );
        if !listed(INSTITUTE_TYPES, self.institute_type.trim()) {
            errors.push("Please select an institute type".to_string());
        }
        if !listed(SUBSCRIPTION_PLANS, self.subscription_plan.trim()) {
            errors.push("Please select a subscription plan".to_string());
        }
        let payment_method = non_empty(&self.payment_method);
        if payment_method.as_deref().is_some_and(|m| !listed(PAYMENT_METHODS, m)) {
            errors.push("Unknown payment method".to_string());
        }
        let student_count = match self.student_count.trim().parse::<i64>() {
            Ok(n) if n >= 0 => Some(n),
            Ok(_) => {
                errors.push("Student count cannot be negative".to_string());
                None
            }
            Err(_) => {
                errors.push("Student count must be a whole number".to_string());
                None
            }
        };
        if !errors.is_empty() {
            return None;
        }
        Some(InstituteFields {
            institute_name: self.institute_name.trim().to_string(),
            address: self.address.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.trim().to_string(),
            institute_type: self.institute_type.trim().to_string(),
            student_count: student_count?,
            contact_person: self.contact_person.trim().to_string(),
            subscription_plan: self.subscription_plan.trim().to_string(),
            payment_method,
        })
    }

    pub fn validate_create(&self) -> Result<NewInstitute, Vec<String>> {
        let mut errors: Vec<String> = validate_required(&self.institute_id, "Institute ID", 50).into_iter().collect();
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!("Admin password must be at least {MIN_PASSWORD_LEN} characters"));
        }
        if non_empty(&self.payment_method).is_none() {
            errors.push("Please select a payment method".to_string());
        }
        match self.check_fields(&mut errors) {
            Some(f) if errors.is_empty() => Ok(NewInstitute {
                institute_id: self.institute_id.trim().to_string(),
                institute_name: f.institute_name,
                address: f.address,
                email: f.email,
                phone: f.phone,
                institute_type: f.institute_type,
                student_count: f.student_count,
                contact_person: f.contact_person,
                subscription_plan: f.subscription_plan,
                payment_method: f.payment_method.unwrap_or_default(),
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }

    pub fn validate_update(&self) -> Result<InstituteUpdate, Vec<String>> {
        let mut errors = Vec::new();
        match self.check_fields(&mut errors) {
            Some(f) => Ok(InstituteUpdate {
                institute_name: f.institute_name,
                address: f.address,
                email: f.email,
                phone: f.phone,
                institute_type: f.institute_type,
                student_count: f.student_count,
                contact_person: f.contact_person,
                subscription_plan: f.subscription_plan,
                payment_method: f.payment_method,
            }),
            None => Err(errors),
        }
    }
}

/// Response of `POST /institutes/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstituteRegistered {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub admin_email: Option<String>,
    pub institute_id: String,
}

/// Response of `PUT` and `DELETE /institutes/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstituteChanged {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub institute_id: Option<String>,
}

/// Response of `POST /api/super-admin/institutes/{id}/toggle-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleInstituteResponse {
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
