use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionYear {
    Y1,
    Y2,
    Y3,
}

impl ProjectionYear {
    pub const fn ordered() -> [Self; 3] {
        [Self::Y1, Self::Y2, Self::Y3]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Y1 => "y1",
            Self::Y2 => "y2",
            Self::Y3 => "y3",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Y1 => "Year 1",
            Self::Y2 => "Year 2",
            Self::Y3 => "Year 3",
        }
    }
}

/// One value per projection year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearMap<T> {
    pub y1: T,
    pub y2: T,
    pub y3: T,
}

impl<T> YearMap<T> {
    pub fn from_fn(mut build: impl FnMut(ProjectionYear) -> T) -> Self {
        Self {
            y1: build(ProjectionYear::Y1),
            y2: build(ProjectionYear::Y2),
            y3: build(ProjectionYear::Y3),
        }
    }

    pub fn get(&self, year: ProjectionYear) -> &T {
        match year {
            ProjectionYear::Y1 => &self.y1,
            ProjectionYear::Y2 => &self.y2,
            ProjectionYear::Y3 => &self.y3,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectionYear, &T)> {
        ProjectionYear::ordered()
            .into_iter()
            .map(move |year| (year, self.get(year)))
    }
}

/// Named grade groupings used for student aggregation and tuition rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortBandKind {
    PrePrimary,
    Primary,
    Middle,
    Secondary,
}

impl CohortBandKind {
    pub const fn ordered() -> [Self; 4] {
        [Self::PrePrimary, Self::Primary, Self::Middle, Self::Secondary]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PrePrimary => "pre_primary",
            Self::Primary => "primary",
            Self::Middle => "middle",
            Self::Secondary => "secondary",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PrePrimary => "Pre-Primary",
            Self::Primary => "Primary",
            Self::Middle => "Middle School",
            Self::Secondary => "Secondary",
        }
    }
}

/// How an itemized tuition row derives its student count from the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuitionTrack {
    Band(CohortBandKind),
    /// Always projected with zero students.
    International,
    /// Keeps whatever count was supplied.
    Unmapped,
}

impl TuitionTrack {
    pub fn from_key(key: &str) -> Self {
        let key = key.trim().to_ascii_lowercase();
        if key.starts_with("international") {
            return Self::International;
        }

        CohortBandKind::ordered()
            .into_iter()
            .find(|band| band.key() == key)
            .map(Self::Band)
            .unwrap_or(Self::Unmapped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    NationalPrincipal,
    NationalDeputyPrincipal,
    NationalTeacher,
    NationalSupport,
    LocalTeacher,
    LocalSupport,
    LocalRepresentativeSupport,
    InternationalTeacher,
}

impl StaffRole {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::NationalPrincipal,
            Self::NationalDeputyPrincipal,
            Self::NationalTeacher,
            Self::NationalSupport,
            Self::LocalTeacher,
            Self::LocalSupport,
            Self::LocalRepresentativeSupport,
            Self::InternationalTeacher,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::NationalPrincipal => "national_principal",
            Self::NationalDeputyPrincipal => "national_deputy_principal",
            Self::NationalTeacher => "national_teacher",
            Self::NationalSupport => "national_support",
            Self::LocalTeacher => "local_teacher",
            Self::LocalSupport => "local_support",
            Self::LocalRepresentativeSupport => "local_representative_support",
            Self::InternationalTeacher => "international_teacher",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NationalPrincipal => "National Principal",
            Self::NationalDeputyPrincipal => "National Deputy Principal",
            Self::NationalTeacher => "National Teacher",
            Self::NationalSupport => "National Support Staff",
            Self::LocalTeacher => "Local Teacher",
            Self::LocalSupport => "Local Support Staff",
            Self::LocalRepresentativeSupport => "Local Representative Support",
            Self::InternationalTeacher => "International Teacher",
        }
    }

    pub const fn salary_line(self) -> SalaryLine {
        match self {
            Self::NationalPrincipal | Self::NationalDeputyPrincipal | Self::NationalTeacher => {
                SalaryLine::NationalStaff
            }
            Self::NationalSupport => SalaryLine::NationalSupportStaff,
            Self::LocalTeacher => SalaryLine::LocalStaff,
            Self::LocalSupport | Self::LocalRepresentativeSupport => SalaryLine::LocalSupportStaff,
            Self::InternationalTeacher => SalaryLine::InternationalStaff,
        }
    }
}

/// Organisational levels a headcount grid is broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffLevel {
    Administration,
    PrePrimary,
    Primary,
    Middle,
    Secondary,
    Dormitory,
    SharedServices,
}

impl StaffLevel {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Administration,
            Self::PrePrimary,
            Self::Primary,
            Self::Middle,
            Self::Secondary,
            Self::Dormitory,
            Self::SharedServices,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Administration => "administration",
            Self::PrePrimary => "pre_primary",
            Self::Primary => "primary",
            Self::Middle => "middle",
            Self::Secondary => "secondary",
            Self::Dormitory => "dormitory",
            Self::SharedServices => "shared_services",
        }
    }
}

/// The five operating expense lines driven by the HR grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryLine {
    NationalStaff,
    NationalSupportStaff,
    LocalStaff,
    LocalSupportStaff,
    InternationalStaff,
}

impl SalaryLine {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::NationalStaff,
            Self::NationalSupportStaff,
            Self::LocalStaff,
            Self::LocalSupportStaff,
            Self::InternationalStaff,
        ]
    }

    /// Key of the line inside the operating expense map.
    pub const fn expense_key(self) -> &'static str {
        match self {
            Self::NationalStaff => "national_staff_salaries",
            Self::NationalSupportStaff => "national_support_staff_salaries",
            Self::LocalStaff => "local_staff_salaries",
            Self::LocalSupportStaff => "local_support_staff_salaries",
            Self::InternationalStaff => "international_staff_salaries",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NationalStaff => "National Staff",
            Self::NationalSupportStaff => "National Support Staff",
            Self::LocalStaff => "Local Staff",
            Self::LocalSupportStaff => "Local Support Staff",
            Self::InternationalStaff => "International Staff",
        }
    }

    pub fn is_salary_key(key: &str) -> bool {
        Self::ordered()
            .into_iter()
            .any(|line| line.expense_key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    /// `value` is a fraction of the tuition fee.
    Percent,
    /// `value` is a flat amount per recipient.
    Fixed,
}

impl DiscountMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "percent" | "percentage" => Some(Self::Percent),
            "fixed" | "amount" => Some(Self::Fixed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuition_keys_resolve_to_tracks() {
        assert_eq!(
            TuitionTrack::from_key("Primary"),
            TuitionTrack::Band(CohortBandKind::Primary)
        );
        assert_eq!(
            TuitionTrack::from_key("international_secondary"),
            TuitionTrack::International
        );
        assert_eq!(TuitionTrack::from_key("summer_camp"), TuitionTrack::Unmapped);
    }

    #[test]
    fn every_role_maps_to_a_salary_line() {
        let national = StaffRole::ordered()
            .into_iter()
            .filter(|role| role.salary_line() == SalaryLine::NationalStaff)
            .count();
        let local_support = StaffRole::ordered()
            .into_iter()
            .filter(|role| role.salary_line() == SalaryLine::LocalSupportStaff)
            .count();
        assert_eq!(national, 3);
        assert_eq!(local_support, 2);
        assert!(SalaryLine::is_salary_key("local_staff_salaries"));
        assert!(!SalaryLine::is_salary_key("rent"));
    }
}
