//! Member classification.
//!
//! Every declared member lands in exactly one [`Category`]. The rules below are
//! tried in order and the first match wins; a member no rule claims is
//! [`Category::Ignored`]. Order matters: a snowflake carrying both the sticker
//! and the action-row marker is a sticker.
//!
//! | # | Rule | Condition |
//! |---|------|-----------|
//! | 1 | Sticker | type == snowflake (exact) and `#[sticker]` present |
//! | 2 | Embed | type == embed (exact) |
//! | 3 | ActionRowSlot(i) | `#[action_row(i)]` present |

use crate::error::GenerationError;
use crate::group::{group_action_rows, ActionRowSlot};
use crate::model::{
    ActionRowGroup, AttributeArg, Category, DeclaredMember, QualifiedName, TypeDeclaration,
};
use crate::registry::TypeRegistry;
use crate::scan::CapabilityBinding;

/// Marker payloads of one member, extracted and validated before any rule runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberMarkers {
    pub is_snowflake: bool,
    pub is_embed: bool,
    pub sticker: bool,
    pub action_row: Option<u32>,
}

impl MemberMarkers {
    pub fn extract(member: &DeclaredMember, registry: &TypeRegistry) -> Result<Self, GenerationError> {
        let type_is = |name: &Option<QualifiedName>| {
            name.as_ref()
                .is_some_and(|name| member.ty.name == *name && member.ty.args.is_empty())
        };

        let sticker = registry
            .sticker_marker
            .as_ref()
            .is_some_and(|marker| member.attributes_of(marker).next().is_some());

        let action_row = match &registry.action_row_marker {
            Some(marker) => {
                let mut found = member.attributes_of(marker);
                match (found.next(), found.next()) {
                    (None, _) => None,
                    (Some(_), Some(_)) => {
                        return Err(GenerationError::DuplicateActionRow {
                            member: member.name.clone(),
                        })
                    }
                    (Some(attr), None) => Some(action_row_index(&member.name, &attr.args)?),
                }
            }
            None => None,
        };

        Ok(Self {
            is_snowflake: type_is(&registry.snowflake),
            is_embed: type_is(&registry.embed),
            sticker,
            action_row,
        })
    }
}

/// Validate the sole constructor argument of an action-row marker.
pub fn action_row_index(member: &str, args: &[AttributeArg]) -> Result<u32, GenerationError> {
    let malformed = |reason: String| GenerationError::MalformedActionRow {
        member: member.to_string(),
        reason,
    };

    match args {
        [] => Err(malformed("missing row index argument".to_string())),
        [AttributeArg::Int(value)] => u32::try_from(*value)
            .map_err(|_| malformed(format!("row index {} is not a non-negative integer", value))),
        [other] => Err(malformed(format!("row index `{}` is not an integer", other))),
        _ => Err(malformed(format!(
            "expected exactly one argument, found {}",
            args.len()
        ))),
    }
}

struct Rule {
    name: &'static str,
    applies: fn(&MemberMarkers) -> Option<Category>,
}

const RULES: [Rule; 3] = [
    Rule {
        name: "sticker",
        applies: |m| (m.is_snowflake && m.sticker).then_some(Category::Sticker),
    },
    Rule {
        name: "embed",
        applies: |m| m.is_embed.then_some(Category::Embed),
    },
    Rule {
        name: "action_row",
        applies: |m| m.action_row.map(Category::ActionRowSlot),
    },
];

pub fn categorize(markers: &MemberMarkers) -> Category {
    RULES
        .iter()
        .find_map(|rule| {
            let category = (rule.applies)(markers)?;
            tracing::trace!(rule = rule.name, ?category, "rule matched");
            Some(category)
        })
        .unwrap_or(Category::Ignored)
}

/// Classification result for one view declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassifiedView {
    pub stickers: Vec<String>,
    pub embeds: Vec<String>,
    pub action_rows: Vec<ActionRowGroup>,
    pub ignored: Vec<String>,
    pub binding: Option<CapabilityBinding>,
}

impl ClassifiedView {
    /// Category of `member`, if it belongs to this declaration.
    pub fn category_of(&self, member: &str) -> Option<Category> {
        if self.stickers.iter().any(|m| m == member) {
            return Some(Category::Sticker);
        }
        if self.embeds.iter().any(|m| m == member) {
            return Some(Category::Embed);
        }
        if let Some(group) = self
            .action_rows
            .iter()
            .find(|group| group.members.iter().any(|m| m == member))
        {
            return Some(Category::ActionRowSlot(group.index));
        }
        self.ignored
            .iter()
            .any(|m| m == member)
            .then_some(Category::Ignored)
    }
}

/// Classify every member of `decl` in source order.
pub fn classify_view(
    decl: &TypeDeclaration,
    registry: &TypeRegistry,
    binding: Option<CapabilityBinding>,
) -> Result<ClassifiedView, GenerationError> {
    let mut view = ClassifiedView {
        binding,
        ..Default::default()
    };
    let mut slots = Vec::new();

    for member in &decl.members {
        let markers = MemberMarkers::extract(member, registry)?;
        let category = categorize(&markers);
        tracing::trace!(member = %member.name, ?category, "classified member");

        match category {
            Category::Sticker => view.stickers.push(member.name.clone()),
            Category::Embed => view.embeds.push(member.name.clone()),
            Category::ActionRowSlot(index) => slots.push(ActionRowSlot {
                index,
                member: member.name.clone(),
            }),
            Category::Ignored => view.ignored.push(member.name.clone()),
        }
    }

    view.action_rows = group_action_rows(slots);
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WellKnownNames;
    use crate::model::{AttributeInstance, Compilation, TypeRef};

    fn registry() -> TypeRegistry {
        let names = WellKnownNames::default();
        let compilation = Compilation {
            references: [
                names.view_marker.clone(),
                names.sticker_marker.clone(),
                names.action_row_marker.clone(),
                names.capability.clone(),
                names.snowflake.clone(),
                names.embed.clone(),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        TypeRegistry::resolve(&compilation, &names)
    }

    fn sticker() -> AttributeInstance {
        AttributeInstance::marker("porbeagle::attributes::sticker")
    }

    fn action_row(args: Vec<AttributeArg>) -> AttributeInstance {
        AttributeInstance::with_args("porbeagle::attributes::action_row", args)
    }

    fn member(name: &str, ty: &str) -> DeclaredMember {
        DeclaredMember::new(name, TypeRef::named(ty))
    }

    fn decl(members: Vec<DeclaredMember>) -> TypeDeclaration {
        let mut decl = TypeDeclaration::new("crate::views", "Example");
        decl.members = members;
        decl
    }

    #[test]
    fn test_snowflake_without_sticker_marker_is_ignored() {
        let view = classify_view(
            &decl(vec![member("id", "porbeagle::Snowflake")]),
            &registry(),
            None,
        )
        .unwrap();
        assert_eq!(view.category_of("id"), Some(Category::Ignored));
        assert!(view.stickers.is_empty());
    }

    #[test]
    fn test_sticker_requires_exact_type() {
        let view = classify_view(
            &decl(vec![
                member("wrapped", "std::option::Option")
                    .with_attribute(sticker()),
                DeclaredMember::new(
                    "generic",
                    TypeRef::generic("porbeagle::Snowflake", vec![TypeRef::named("u8")]),
                )
                .with_attribute(sticker()),
                member("real", "porbeagle::Snowflake").with_attribute(sticker()),
            ]),
            &registry(),
            None,
        )
        .unwrap();
        assert_eq!(view.stickers, vec!["real"]);
        assert_eq!(view.ignored, vec!["wrapped", "generic"]);
    }

    #[test]
    fn test_rule_order_first_match_wins() {
        let view = classify_view(
            &decl(vec![
                member("both", "porbeagle::Snowflake")
                    .with_attribute(sticker())
                    .with_attribute(action_row(vec![AttributeArg::Int(0)])),
                member("embed_row", "porbeagle::Embed")
                    .with_attribute(action_row(vec![AttributeArg::Int(1)])),
                member("snowflake_row", "porbeagle::Snowflake")
                    .with_attribute(action_row(vec![AttributeArg::Int(2)])),
            ]),
            &registry(),
            None,
        )
        .unwrap();

        assert_eq!(view.category_of("both"), Some(Category::Sticker));
        assert_eq!(view.category_of("embed_row"), Some(Category::Embed));
        assert_eq!(view.category_of("snowflake_row"), Some(Category::ActionRowSlot(2)));
    }

    #[test]
    fn test_every_member_classified_once() {
        let members = vec![
            member("text", "std::string::String"),
            member("sticker", "porbeagle::Snowflake").with_attribute(sticker()),
            member("embed", "porbeagle::Embed"),
            member("b", "porbeagle::Button").with_attribute(action_row(vec![AttributeArg::Int(3)])),
            member("a", "porbeagle::Button").with_attribute(action_row(vec![AttributeArg::Int(0)])),
        ];
        let view = classify_view(&decl(members.clone()), &registry(), None).unwrap();

        let mut seen: Vec<String> = view
            .stickers
            .iter()
            .chain(&view.embeds)
            .chain(view.action_rows.iter().flat_map(|g| &g.members))
            .chain(&view.ignored)
            .cloned()
            .collect();
        seen.sort();
        let mut expected: Vec<String> = members.into_iter().map(|m| m.name).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_action_row_index_validation() {
        assert_eq!(action_row_index("m", &[AttributeArg::Int(4)]), Ok(4));
        assert!(matches!(
            action_row_index("m", &[]),
            Err(GenerationError::MalformedActionRow { .. })
        ));
        assert!(matches!(
            action_row_index("m", &[AttributeArg::Int(-1)]),
            Err(GenerationError::MalformedActionRow { .. })
        ));
        assert!(matches!(
            action_row_index("m", &[AttributeArg::Int(i64::from(u32::MAX) + 1)]),
            Err(GenerationError::MalformedActionRow { .. })
        ));
        assert!(matches!(
            action_row_index("m", &[AttributeArg::Str("0".to_string())]),
            Err(GenerationError::MalformedActionRow { .. })
        ));
        assert!(matches!(
            action_row_index("m", &[AttributeArg::Int(0), AttributeArg::Int(1)]),
            Err(GenerationError::MalformedActionRow { .. })
        ));
    }

    #[test]
    fn test_malformed_marker_fails_even_when_shadowed() {
        let result = classify_view(
            &decl(vec![member("sticker", "porbeagle::Snowflake")
                .with_attribute(sticker())
                .with_attribute(action_row(vec![]))]),
            &registry(),
            None,
        );
        assert_eq!(
            result,
            Err(GenerationError::MalformedActionRow {
                member: "sticker".to_string(),
                reason: "missing row index argument".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_action_row_marker() {
        let result = classify_view(
            &decl(vec![member("button", "porbeagle::Button")
                .with_attribute(action_row(vec![AttributeArg::Int(0)]))
                .with_attribute(action_row(vec![AttributeArg::Int(1)]))]),
            &registry(),
            None,
        );
        assert!(matches!(
            result,
            Err(GenerationError::DuplicateActionRow { .. })
        ));
    }

    #[test]
    fn test_unresolved_embed_never_matches() {
        let names = WellKnownNames::default();
        let compilation = Compilation {
            references: [names.sticker_marker.clone(), names.snowflake.clone()]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let registry = TypeRegistry::resolve(&compilation, &names);

        let view = classify_view(
            &decl(vec![
                member("embed", "porbeagle::Embed"),
                member("row", "porbeagle::Button")
                    .with_attribute(action_row(vec![AttributeArg::Str("bad".into())])),
            ]),
            &registry,
            None,
        )
        .unwrap();
        assert_eq!(view.ignored, vec!["embed", "row"]);
    }
}
