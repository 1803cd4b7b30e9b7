//! Schema shape fingerprint.
//!
//! A short stable string summarizing the declared shape of every persisted
//! entity kind. The migration engine compares it against the value recorded
//! in the store; any field add, remove, or type change produces a new
//! string, while declaration order never does. The registry below is the
//! single place a shape change must be declared.

use sha2::{Digest, Sha256};

use crate::entities::EntityKind;

/// Declared shape of one persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
}

/// Declared shape of one persisted entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityShape {
    pub kind: EntityKind,
    pub fields: &'static [FieldShape],
}

const fn field(name: &'static str, sql_type: &'static str, nullable: bool) -> FieldShape {
    FieldShape { name, sql_type, nullable }
}

/// Shape registry for every persisted kind. Must stay in sync with the
/// storage schema; the storage crate asserts that in its tests.
pub const PERSISTED_SHAPES: &[EntityShape] = &[
    EntityShape {
        kind: EntityKind::User,
        fields: &[
            field("id", "INTEGER", false),
            field("username", "TEXT", false),
            field("password_hash", "TEXT", false),
            field("salt", "TEXT", false),
            field("created_at", "TEXT", false),
            field("last_login_at", "TEXT", true),
            field("is_active", "TEXT", false),
        ],
    },
    EntityShape {
        kind: EntityKind::Category,
        fields: &[
            field("id", "INTEGER", false),
            field("name", "TEXT", false),
            field("owner_user_id", "INTEGER", false),
        ],
    },
    EntityShape {
        kind: EntityKind::Transaction,
        fields: &[
            field("id", "TEXT", false),
            field("amount", "REAL", false),
            field("observations", "TEXT", false),
            field("date", "TEXT", false),
            field("owner_user_id", "INTEGER", false),
            field("category_id", "INTEGER", true),
        ],
    },
    EntityShape {
        kind: EntityKind::Fingerprint,
        fields: &[
            field("id", "INTEGER", false),
            field("fingerprint", "TEXT", false),
        ],
    },
];

/// Fingerprint of the current declared shapes.
pub fn current() -> String {
    fingerprint_of(PERSISTED_SHAPES)
}

/// Fingerprint of an arbitrary shape set. Kinds and fields are sorted by
/// name before hashing, so two registries that declare the same shapes in
/// a different order hash identically.
pub fn fingerprint_of(shapes: &[EntityShape]) -> String {
    let mut ordered: Vec<&EntityShape> = shapes.iter().collect();
    ordered.sort_by_key(|s| s.kind.table_name());

    let mut hasher = Sha256::new();
    for shape in ordered {
        hasher.update(shape.kind.table_name().as_bytes());
        hasher.update(b"\n");

        let mut fields: Vec<&FieldShape> = shape.fields.iter().collect();
        fields.sort_by_key(|f| f.name);
        for f in fields {
            let nullability: &[u8] = if f.nullable { b":null\n" } else { b":req\n" };
            hasher.update(f.name.as_bytes());
            hasher.update(b":");
            hasher.update(f.sql_type.as_bytes());
            hasher.update(nullability);
        }
    }
    hex::encode(hasher.finalize())
}
