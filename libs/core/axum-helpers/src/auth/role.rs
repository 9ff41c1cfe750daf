use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Account role. Wire names are the storefront's stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "Administrador")]
    Admin,
    #[default]
    #[serde(rename = "Cliente")]
    Customer,
    #[serde(rename = "Empleado")]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Customer => "Cliente",
            Role::Employee => "Empleado",
        }
    }

    /// Admins and employees manage the catalog
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Administrador" => Ok(Role::Admin),
            "Cliente" => Ok(Role::Customer),
            "Empleado" => Ok(Role::Employee),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"Administrador\"");
        let role: Role = serde_json::from_str("\"Empleado\"").unwrap();
        assert_eq!(role, Role::Employee);
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_role_from_str_round_trip() {
        for role in [Role::Admin, Role::Customer, Role::Employee] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("Root".parse::<Role>().is_err());
    }

    #[test]
    fn test_staff_roles() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Employee.is_staff());
        assert!(!Role::Customer.is_staff());
    }
}
