use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

/// The identity a request acts on behalf of.
///
/// Built by the presentation layer from its session. The role claim is what
/// grants moderation rights, never the id value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn member(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Member,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Only the author may rewrite a comment.
    pub fn can_edit(&self, author_id: &str) -> bool {
        self.id == author_id
    }

    /// The author or a moderator may remove a comment.
    pub fn can_delete(&self, author_id: &str) -> bool {
        self.id == author_id || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_id_string_alone_grants_nothing() {
        let impostor = Actor::member("admin");
        assert!(!impostor.can_delete("u1"));
        assert!(Actor::admin("mod-7").can_delete("u1"));
    }

    #[test]
    fn admins_cannot_edit_others() {
        assert!(!Actor::admin("mod-7").can_edit("u1"));
        assert!(Actor::member("u1").can_edit("u1"));
    }
}
