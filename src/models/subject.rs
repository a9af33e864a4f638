/// JEE subject enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    Physics,
    Chemistry,
    Mathematics,
}

impl Subject {
    /// Display name as used on the wire and in draft files.
    pub fn name(self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Mathematics => "Mathematics",
        }
    }

    /// All subjects, in paper order.
    pub fn all() -> [Subject; 3] {
        [Subject::Physics, Subject::Chemistry, Subject::Mathematics]
    }

    /// Exact-match parse.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "Physics" => Some(Subject::Physics),
            "Chemistry" => Some(Subject::Chemistry),
            "Mathematics" | "Maths" => Some(Subject::Mathematics),
            _ => None,
        }
    }

    /// Lenient lookup for hand-written draft files ("phy", "maths", ...).
    pub fn find(s: &str) -> Option<Self> {
        if let Some(subject) = Self::from_name(s) {
            return Some(subject);
        }

        let s_lower = s.to_lowercase();
        if s_lower.starts_with("phy") {
            return Some(Subject::Physics);
        }
        if s_lower.starts_with("chem") {
            return Some(Subject::Chemistry);
        }
        if s_lower.starts_with("math") {
            return Some(Subject::Mathematics);
        }

        None
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_lenient() {
        assert_eq!(Subject::find("phy"), Some(Subject::Physics));
        assert_eq!(Subject::find("Maths"), Some(Subject::Mathematics));
        assert_eq!(Subject::find("chemistry"), Some(Subject::Chemistry));
        assert_eq!(Subject::find("biology"), None);
    }
}
