//! Fixed subject registry.

use serde::Serialize;

use crate::error::UserInputError;

/// Color used when a stored record refers to a subject that no longer exists.
pub const DEFAULT_SUBJECT_COLOR: &str = "#4682B4";

/// A course a captioning session can be held for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: u32,
    pub name: &'static str,
    pub code: &'static str,
    pub color: &'static str,
}

static SUBJECTS: [Subject; 5] = [
    Subject {
        id: 1,
        name: "웹 프로그래밍",
        code: "CS101",
        color: "#4682B4",
    },
    Subject {
        id: 2,
        name: "데이터베이스 시스템",
        code: "CS201",
        color: "#10b981",
    },
    Subject {
        id: 3,
        name: "인공지능 기초",
        code: "CS301",
        color: "#f59e0b",
    },
    Subject {
        id: 4,
        name: "소프트웨어 공학",
        code: "CS401",
        color: "#ef4444",
    },
    Subject {
        id: 5,
        name: "컴퓨터 네트워크",
        code: "CS501",
        color: "#8b5cf6",
    },
];

pub fn all() -> &'static [Subject] {
    &SUBJECTS
}

pub fn find(id: u32) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.id == id)
}

pub fn find_by_code(code: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.code.eq_ignore_ascii_case(code.trim()))
}

/// Resolves a subject from either its numeric id or its course code.
pub fn lookup(key: &str) -> Result<&'static Subject, UserInputError> {
    let found = match key.trim().parse::<u32>() {
        Ok(id) => find(id),
        Err(_) => find_by_code(key),
    };
    found.ok_or_else(|| UserInputError::UnknownSubject(key.to_string()))
}

pub fn subject_color(id: u32) -> &'static str {
    find(id).map_or(DEFAULT_SUBJECT_COLOR, |s| s.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id_and_code() {
        assert_eq!(lookup("3").unwrap().code, "CS301");
        assert_eq!(lookup("cs501").unwrap().id, 5);
        assert_eq!(
            lookup("CS999"),
            Err(UserInputError::UnknownSubject("CS999".into()))
        );
    }

    #[test]
    fn test_unknown_subject_uses_default_color() {
        assert_eq!(subject_color(2), "#10b981");
        assert_eq!(subject_color(42), DEFAULT_SUBJECT_COLOR);
    }
}
