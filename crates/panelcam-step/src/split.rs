// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part/accessory splitting
//!
//! Cabinet exports mix machinable panels with hardware: screws, hinges,
//! edge banding, drawer slides. Hardware is recognized by name keywords
//! (the vocabulary is bilingual, matching the furniture CAD tools this
//! pipeline receives files from), tallied, and excluded from geometry
//! processing.

use crate::resolver::EntityGraph;
use panelcam_model::{Accessory, EntityId, StepType};

/// Name keywords that mark a solid as hardware rather than a panel
const ACCESSORY_KEYWORDS: &[&str] = &[
    "parafuso", "screw", "bolt",
    "borda", "edge", "fita",
    "ferragem", "hardware",
    "dobradica", "hinge",
    "puxador", "handle",
    "corredica", "corrediça", "slide",
    "cavilha", "dowel",
    "prego", "nail",
    "acessorio", "accessory",
];

/// Case-insensitive keyword test against a solid name
pub fn is_accessory_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    ACCESSORY_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// A solid with its display name resolved
#[derive(Clone, Debug)]
pub struct NamedSolid {
    pub id: EntityId,
    pub name: String,
}

/// Discover every named solid in the graph
///
/// Names come from the shape representation wrapping each solid: the
/// solid's own name string wins, the representation name is the
/// fallback, and unnamed solids get a synthetic `Part_<id>`. Solids not
/// referenced by any representation are still returned so that minimal
/// documents work.
pub fn named_solids(graph: &mut EntityGraph) -> Vec<NamedSolid> {
    let mut solids: Vec<NamedSolid> = Vec::new();
    let mut claimed: Vec<EntityId> = Vec::new();

    for repr_id in graph.ids_of_type(&StepType::AdvancedBrepShapeRepresentation) {
        let Some(repr) = graph.get(repr_id) else {
            continue;
        };
        let repr_name = repr.name_attr().unwrap_or("").to_string();

        for ref_id in repr.all_refs() {
            let Some(child) = graph.get(ref_id) else {
                continue;
            };
            if child.step_type != StepType::ManifoldSolidBrep {
                continue;
            }

            let own_name = child.name_attr().unwrap_or("").trim().to_string();
            let name = if !own_name.is_empty() {
                own_name
            } else if !repr_name.trim().is_empty() {
                repr_name.trim().to_string()
            } else {
                format!("Part_{}", ref_id.0)
            };

            claimed.push(ref_id);
            solids.push(NamedSolid { id: ref_id, name });
        }
    }

    // Bare solids without a representation parent
    for solid_id in graph.ids_of_type(&StepType::ManifoldSolidBrep) {
        if claimed.contains(&solid_id) {
            continue;
        }
        let Some(solid) = graph.get(solid_id) else {
            continue;
        };
        let own_name = solid.name_attr().unwrap_or("").trim().to_string();
        let name = if own_name.is_empty() {
            format!("Part_{}", solid_id.0)
        } else {
            own_name
        };
        solids.push(NamedSolid { id: solid_id, name });
    }

    solids.sort_by_key(|s| s.id.0);
    solids
}

/// Split named solids into machinable parts and an accessory tally
pub fn split_accessories(solids: Vec<NamedSolid>) -> (Vec<NamedSolid>, Vec<Accessory>) {
    let mut parts = Vec::new();
    let mut accessories: Vec<Accessory> = Vec::new();

    for solid in solids {
        if is_accessory_name(&solid.name) {
            match accessories.iter_mut().find(|a| a.name == solid.name) {
                Some(existing) => existing.count += 1,
                None => accessories.push(Accessory {
                    name: solid.name,
                    count: 1,
                }),
            }
        } else {
            parts.push(solid);
        }
    }

    (parts, accessories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(is_accessory_name("Parafuso M6"));
        assert!(is_accessory_name("EDGE BANDING 2mm"));
        assert!(is_accessory_name("Dobradica 35mm"));
        assert!(!is_accessory_name("Lateral esquerda"));
        assert!(!is_accessory_name("Prateleira"));
    }

    #[test]
    fn test_named_solids_prefer_own_name() {
        let content = r#"
#1 = MANIFOLD_SOLID_BREP('Base',#10);
#2 = MANIFOLD_SOLID_BREP('',#11);
#3 = ADVANCED_BREP_SHAPE_REPRESENTATION('Cabinet',(#1,#2),#20);
"#;
        let mut graph = EntityGraph::new(content);
        let solids = named_solids(&mut graph);

        assert_eq!(solids.len(), 2);
        assert_eq!(solids[0].name, "Base");
        assert_eq!(solids[1].name, "Cabinet");
    }

    #[test]
    fn test_bare_solid_discovered() {
        let content = "#7 = MANIFOLD_SOLID_BREP('Side panel',#10);";
        let mut graph = EntityGraph::new(content);
        let solids = named_solids(&mut graph);

        assert_eq!(solids.len(), 1);
        assert_eq!(solids[0].name, "Side panel");
    }

    #[test]
    fn test_unnamed_solid_gets_synthetic_name() {
        let content = "#7 = MANIFOLD_SOLID_BREP('',#10);";
        let mut graph = EntityGraph::new(content);
        let solids = named_solids(&mut graph);
        assert_eq!(solids[0].name, "Part_7");
    }

    #[test]
    fn test_split_tallies_accessories() {
        let solids = vec![
            NamedSolid {
                id: EntityId(1),
                name: "Base".into(),
            },
            NamedSolid {
                id: EntityId(2),
                name: "Parafuso M6".into(),
            },
            NamedSolid {
                id: EntityId(3),
                name: "Parafuso M6".into(),
            },
            NamedSolid {
                id: EntityId(4),
                name: "Hinge 35".into(),
            },
        ];

        let (parts, accessories) = split_accessories(solids);
        assert_eq!(parts.len(), 1);
        assert_eq!(accessories.len(), 2);
        assert_eq!(accessories[0].name, "Parafuso M6");
        assert_eq!(accessories[0].count, 2);
        assert_eq!(accessories[1].count, 1);
    }
}
