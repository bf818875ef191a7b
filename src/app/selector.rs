use crate::app::models::{
    normalize_separators, CandidatePath, ExtensionClass, InclusionRules, Selection,
};
use std::collections::HashSet;

/// Splits candidates into files to format in place and manifests to format as JSON.
///
/// Output keeps candidate order and never lists a path twice, even when the
/// same path arrives from several listings or matches several rules.
pub fn select(candidates: &[CandidatePath], rules: &InclusionRules) -> Selection {
    let mut selection = Selection::default();
    let mut seen = HashSet::new();

    for candidate in candidates {
        let bucket = match candidate.class() {
            // Manifests are not restricted to project prefixes.
            ExtensionClass::Json => &mut selection.json_files,
            ExtensionClass::Source if is_first_party(candidate.as_str(), rules) => {
                &mut selection.source_files
            }
            _ => continue,
        };
        if seen.insert(candidate.as_str()) {
            bucket.push(candidate.clone());
        }
    }

    selection
}

fn is_first_party(path: &str, rules: &InclusionRules) -> bool {
    rules.projects.iter().any(|project| {
        let prefix = InclusionRules::project_prefix(project);
        let Some(rest) = path.strip_prefix(prefix.as_str()) else {
            return false;
        };
        if rest.starts_with(rules.source_subpath.as_str()) {
            return true;
        }
        let Some(plugin_path) = rest.strip_prefix("Plugins/") else {
            return false;
        };
        rules.plugin_allowlist.iter().any(|plugin| {
            plugin_path
                .strip_prefix(plugin.as_str())
                .and_then(|p| p.strip_prefix('/'))
                .is_some_and(|p| p.starts_with(rules.source_subpath.as_str()))
        })
    })
}

/// Keeps the candidates under `root` and strips that prefix from them.
///
/// An empty root leaves the candidates unchanged.
pub fn scope_to_root(candidates: Vec<CandidatePath>, root: &str) -> Vec<CandidatePath> {
    let prefix = InclusionRules::project_prefix(&normalize_separators(root));
    if prefix.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter_map(|c| c.as_str().strip_prefix(prefix.as_str()).map(CandidatePath::new))
        .collect()
}

/// Inside a sub-project the root is the project, so only the plugin allowlist carries over.
pub fn rules_for_root(rules: &InclusionRules, root: &str) -> InclusionRules {
    if normalize_separators(root).trim_matches('/').is_empty() {
        rules.clone()
    } else {
        InclusionRules::single_project(rules.plugin_allowlist.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(raw: &[&str]) -> Vec<CandidatePath> {
        raw.iter().map(CandidatePath::new).collect()
    }

    fn strs(paths: &[CandidatePath]) -> Vec<&str> {
        paths.iter().map(|p| p.as_str()).collect()
    }

    fn blaster_rules() -> InclusionRules {
        InclusionRules::new(vec!["Blaster".into()], vec!["RuleRanger".into()])
    }

    #[test]
    fn selects_project_source_and_allowed_plugins() {
        let candidates = paths(&[
            "Blaster/Source/A.cpp",
            "Blaster/Plugins/RuleRanger/Source/B.h",
            "Blaster/Plugins/Other/Source/C.h",
            "Blaster/Other/D.cpp",
            "Blaster/Game.uproject",
        ]);

        let selection = select(&candidates, &blaster_rules());

        assert_eq!(
            strs(&selection.source_files),
            vec!["Blaster/Source/A.cpp", "Blaster/Plugins/RuleRanger/Source/B.h"]
        );
        assert_eq!(strs(&selection.json_files), vec!["Blaster/Game.uproject"]);
    }

    #[test]
    fn empty_input_gives_empty_selection() {
        let selection = select(&[], &blaster_rules());
        assert!(selection.is_empty());
    }

    #[test]
    fn duplicates_are_kept_once_in_first_position() {
        let candidates = paths(&[
            "Blaster/Source/A.cpp",
            "Blaster/Game.uproject",
            "Blaster/Source/B.h",
            "Blaster/Source/A.cpp",
            "Blaster/Game.uproject",
        ]);
        // Two projects sharing a name must not produce a second match either.
        let rules = InclusionRules::new(
            vec!["Blaster".into(), "Blaster".into()],
            vec!["RuleRanger".into()],
        );

        let selection = select(&candidates, &rules);

        assert_eq!(
            strs(&selection.source_files),
            vec!["Blaster/Source/A.cpp", "Blaster/Source/B.h"]
        );
        assert_eq!(strs(&selection.json_files), vec!["Blaster/Game.uproject"]);
    }

    #[test]
    fn output_is_a_subsequence_of_input() {
        let candidates = paths(&[
            "MenuSystem/Source/Z.h",
            "Blaster/Source/A.cpp",
            "MenuSystem/MenuSystem.uproject",
            "Blaster/Plugins/RuleRanger/RuleRanger.uplugin",
            "Blaster/Source/Blaster.Build.cs",
            "Docs/readme.md",
        ]);
        let rules = InclusionRules::default();

        let selection = select(&candidates, &rules);

        let input = strs(&candidates);
        for list in [&selection.source_files, &selection.json_files] {
            let positions: Vec<usize> = list
                .iter()
                .map(|p| input.iter().position(|c| *c == p.as_str()).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(selection.len(), 5);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let candidates = paths(&["Blaster/Source/A.CPP", "Blaster/Source/B.H", "Blaster/X.UPLUGIN"]);
        let selection = select(&candidates, &blaster_rules());
        assert_eq!(selection.source_files.len(), 2);
        assert_eq!(selection.json_files.len(), 1);
    }

    #[test]
    fn prefixes_are_case_sensitive_and_exact() {
        let candidates = paths(&[
            "blaster/Source/A.cpp",
            "BlasterX/Source/A.cpp",
            "Blaster/SourceCode/A.cpp",
            "Blaster/Plugins/RuleRangerExtra/Source/A.cpp",
            "Blaster/Plugins/RuleRanger/Content/A.h",
        ]);
        let selection = select(&candidates, &blaster_rules());
        assert!(selection.source_files.is_empty());
    }

    #[test]
    fn backslash_paths_are_normalized_before_matching() {
        let candidates = paths(&[r"Blaster\Source\A.cpp", r"Blaster\Plugins\RuleRanger\Source\B.h"]);
        let selection = select(&candidates, &blaster_rules());
        assert_eq!(
            strs(&selection.source_files),
            vec!["Blaster/Source/A.cpp", "Blaster/Plugins/RuleRanger/Source/B.h"]
        );
    }

    #[test]
    fn other_extensions_are_excluded() {
        let candidates = paths(&["Blaster/Source/A.txt", "Blaster/Source/A.hpp", "Blaster/Source/A"]);
        assert!(select(&candidates, &blaster_rules()).is_empty());
    }

    #[test]
    fn single_project_rules_match_plain_source_prefix() {
        let rules = InclusionRules::single_project(vec!["MultiplayerSessions".into()]);
        let candidates = paths(&[
            "Source/MenuSystem/MenuSystemCharacter.cpp",
            "Plugins/MultiplayerSessions/Source/MultiplayerSessions/Private/Menu.cpp",
            "Plugins/Other/Source/Other.cpp",
            "Config/DefaultGame.ini",
        ]);

        let selection = select(&candidates, &rules);

        assert_eq!(
            strs(&selection.source_files),
            vec![
                "Source/MenuSystem/MenuSystemCharacter.cpp",
                "Plugins/MultiplayerSessions/Source/MultiplayerSessions/Private/Menu.cpp",
            ]
        );
    }

    #[test]
    fn scoping_strips_root_and_drops_outsiders() {
        let candidates = paths(&["MenuSystem/Source/X.h", "Blaster/Source/Y.h", "MenuSystemOld/Source/Z.h"]);

        let scoped = scope_to_root(candidates, "MenuSystem/");

        assert_eq!(strs(&scoped), vec!["Source/X.h"]);
    }

    #[test]
    fn scoping_accepts_root_without_trailing_slash() {
        let scoped = scope_to_root(paths(&["MenuSystem/Source/X.h"]), "MenuSystem");
        assert_eq!(strs(&scoped), vec!["Source/X.h"]);
    }

    #[test]
    fn empty_root_keeps_candidates_and_rules() {
        let candidates = paths(&["Blaster/Source/A.cpp"]);
        assert_eq!(scope_to_root(candidates.clone(), ""), candidates);
        assert_eq!(rules_for_root(&blaster_rules(), ""), blaster_rules());
    }

    #[test]
    fn scoped_changed_set_selects_stripped_paths() {
        let candidates = paths(&[
            "MenuSystem/Source/X.h",
            "MenuSystem/MenuSystem.uproject",
            "Blaster/Source/A.cpp",
        ]);
        let rules = rules_for_root(&InclusionRules::default(), "MenuSystem/");

        let selection = select(&scope_to_root(candidates, "MenuSystem/"), &rules);

        assert_eq!(strs(&selection.source_files), vec!["Source/X.h"]);
        assert_eq!(strs(&selection.json_files), vec!["MenuSystem.uproject"]);
    }
}
