use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Transient,
    Volatile,
    Synchronized,
    Native,
}

/// Access level of a member, ordered from least to most permissive.
///
/// Package-private ranks above protected: the builder lives in the
/// controller's package and never subclasses it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    Private,
    Protected,
    Package,
    Public,
}

impl Visibility {
    pub fn of(modifiers: &[Modifier]) -> Self {
        if modifiers.contains(&Modifier::Public) {
            Visibility::Public
        } else if modifiers.contains(&Modifier::Protected) {
            Visibility::Protected
        } else if modifiers.contains(&Modifier::Private) {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_modifier_decides_visibility() {
        assert_eq!(Visibility::of(&[Modifier::Public, Modifier::Final]), Visibility::Public);
        assert_eq!(Visibility::of(&[Modifier::Protected]), Visibility::Protected);
        assert_eq!(Visibility::of(&[Modifier::Private, Modifier::Static]), Visibility::Private);
        assert_eq!(Visibility::of(&[Modifier::Final, Modifier::Static]), Visibility::Package);
        assert_eq!(Visibility::of(&[]), Visibility::Package);
    }

    #[test]
    fn package_ranks_between_protected_and_public() {
        assert!(Visibility::Public > Visibility::Package);
        assert!(Visibility::Package > Visibility::Protected);
        assert!(Visibility::Protected > Visibility::Private);
    }
}
