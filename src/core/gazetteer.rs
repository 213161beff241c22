//! Static gazetteer of Nigerian states, aliases and distance tables
//!
//! The gazetteer is the only long-lived data in the estimator: the 36
//! federal states plus the Federal Capital Territory, the settlements used
//! for free-text matching, a table of approximate road distances from the
//! Lagos reference point, and representative intra-state distances.
//!
//! Distances are one-way road kilometers from the reference point to each
//! state's capital or major city, rounded to coarse values. They feed the
//! heuristic fallback chain in the resolver, not any precise routing.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// State treated as the fixed origin point for most deliveries.
pub const REFERENCE_STATE: &str = "Lagos";

/// Intra-state distance used when a state has no explicit same-state entry.
pub const DEFAULT_SAME_STATE_KM: f64 = 35.0;

/// One Nigerian federal state (or the Federal Capital Territory)
#[derive(Debug, Clone)]
pub struct StateRecord {
    /// Unique state name
    pub name: String,

    /// Known settlements within the state, used only for text matching
    pub cities: Vec<String>,
}

impl StateRecord {
    pub fn new(name: &str, cities: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            cities: cities.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A compiled whole-word matching rule mapping matched text to a state
pub(crate) struct NameRule {
    pub pattern: Regex,
    pub state: String,
}

/// Static geography data backing the matcher and resolver
///
/// Construction compiles every state, alias and city name into a
/// case-insensitive whole-word regex, so matching itself never fails.
/// Malformed data (an alias or distance entry naming an unknown state,
/// duplicate state names) is a configuration bug and panics at load.
pub struct Gazetteer {
    states: Vec<StateRecord>,
    reference_state: String,
    state_rules: Vec<NameRule>,
    alias_rules: Vec<NameRule>,
    city_rules: Vec<NameRule>,
    distances_from_reference: HashMap<String, f64>,
    same_state_distances: HashMap<String, f64>,
}

/// Compile a whole-word, case-insensitive pattern for a gazetteer name.
///
/// Metacharacters in the name are escaped so names are treated literally,
/// and `\b` anchoring keeps "Edo" from matching inside "Edofield".
fn word_pattern(name: &str) -> Regex {
    let source = format!(r"(?i)\b{}\b", regex::escape(name));
    Regex::new(&source).expect("failed to compile gazetteer name pattern")
}

impl Gazetteer {
    /// Build a gazetteer from raw records and tables.
    ///
    /// Declaration order is load-bearing: the matcher tests rules in the
    /// order given here, and the first hit wins.
    pub fn new(
        states: Vec<StateRecord>,
        reference_state: &str,
        aliases: Vec<(String, String)>,
        distances_from_reference: Vec<(String, f64)>,
        same_state_distances: Vec<(String, f64)>,
    ) -> Self {
        let names: Vec<&str> = states.iter().map(|s| s.name.as_str()).collect();
        let known = |name: &str| names.contains(&name);

        for (i, state) in states.iter().enumerate() {
            assert!(
                !states[..i].iter().any(|other| other.name == state.name),
                "duplicate state name in gazetteer: {}",
                state.name
            );
        }
        assert!(
            known(reference_state),
            "reference state is not in the gazetteer: {reference_state}"
        );
        for (alias, state) in &aliases {
            assert!(known(state), "alias '{alias}' targets unknown state: {state}");
        }
        for (state, km) in &distances_from_reference {
            assert!(known(state), "distance entry for unknown state: {state}");
            assert!(*km >= 0.0, "negative distance for state: {state}");
        }
        for (state, _) in &same_state_distances {
            assert!(known(state), "same-state entry for unknown state: {state}");
        }

        let state_rules = states
            .iter()
            .map(|s| NameRule {
                pattern: word_pattern(&s.name),
                state: s.name.clone(),
            })
            .collect();

        let alias_rules = aliases
            .iter()
            .map(|(alias, state)| NameRule {
                pattern: word_pattern(alias),
                state: state.clone(),
            })
            .collect();

        let city_rules = states
            .iter()
            .flat_map(|s| {
                s.cities.iter().map(|city| NameRule {
                    pattern: word_pattern(city),
                    state: s.name.clone(),
                })
            })
            .collect();

        Self {
            states,
            reference_state: reference_state.to_string(),
            state_rules,
            alias_rules,
            city_rules,
            distances_from_reference: distances_from_reference.into_iter().collect(),
            same_state_distances: same_state_distances.into_iter().collect(),
        }
    }

    /// The built-in Nigerian gazetteer, loaded once per process
    pub fn nigeria() -> &'static Gazetteer {
        static NIGERIA: OnceLock<Gazetteer> = OnceLock::new();
        NIGERIA.get_or_init(|| {
            Gazetteer::new(
                nigeria_states(),
                REFERENCE_STATE,
                nigeria_aliases(),
                distances_from_lagos(),
                same_state_distances(),
            )
        })
    }

    /// All states in declaration order
    pub fn states(&self) -> &[StateRecord] {
        &self.states
    }

    /// Name of the reference state ("Lagos" in the built-in data)
    pub fn reference_state(&self) -> &str {
        &self.reference_state
    }

    /// Approximate road distance from the reference point to a state, if known
    pub fn distance_from_reference(&self, state: &str) -> Option<f64> {
        self.distances_from_reference.get(state).copied()
    }

    /// Representative intra-state distance for same-state deliveries
    pub fn same_state_distance(&self, state: &str) -> f64 {
        self.same_state_distances
            .get(state)
            .copied()
            .unwrap_or(DEFAULT_SAME_STATE_KM)
    }

    pub(crate) fn state_rules(&self) -> &[NameRule] {
        &self.state_rules
    }

    pub(crate) fn alias_rules(&self) -> &[NameRule] {
        &self.alias_rules
    }

    pub(crate) fn city_rules(&self) -> &[NameRule] {
        &self.city_rules
    }
}

fn nigeria_states() -> Vec<StateRecord> {
    vec![
        StateRecord::new("Abia", &["Umuahia", "Aba", "Arochukwu", "Ohafia"]),
        StateRecord::new("Adamawa", &["Yola", "Mubi", "Jimeta", "Numan"]),
        StateRecord::new("Akwa Ibom", &["Uyo", "Eket", "Ikot Ekpene", "Oron"]),
        StateRecord::new("Anambra", &["Awka", "Onitsha", "Nnewi", "Ekwulobia"]),
        StateRecord::new("Bauchi", &["Azare", "Misau", "Jamaare"]),
        StateRecord::new("Bayelsa", &["Yenagoa", "Brass", "Ogbia", "Sagbama"]),
        StateRecord::new("Benue", &["Makurdi", "Gboko", "Otukpo", "Katsina-Ala"]),
        StateRecord::new("Borno", &["Maiduguri", "Bama", "Biu", "Dikwa"]),
        StateRecord::new("Cross River", &["Calabar", "Ugep", "Ogoja", "Ikom", "Obudu"]),
        StateRecord::new("Delta", &["Asaba", "Warri", "Sapele", "Ughelli", "Agbor"]),
        StateRecord::new("Ebonyi", &["Abakaliki", "Afikpo", "Onueke"]),
        StateRecord::new("Edo", &["Benin City", "Auchi", "Ekpoma", "Uromi"]),
        StateRecord::new("Ekiti", &["Ado-Ekiti", "Ikere", "Oye", "Efon-Alaaye"]),
        StateRecord::new("Enugu", &["Nsukka", "Oji River", "Awgu", "Udi"]),
        StateRecord::new(
            "Federal Capital Territory",
            &["Garki", "Wuse", "Maitama", "Gwagwalada", "Kubwa", "Asokoro"],
        ),
        StateRecord::new("Gombe", &["Kaltungo", "Dukku", "Bajoga"]),
        StateRecord::new("Imo", &["Owerri", "Orlu", "Okigwe"]),
        StateRecord::new("Jigawa", &["Dutse", "Hadejia", "Gumel", "Kazaure"]),
        StateRecord::new("Kaduna", &["Zaria", "Kafanchan", "Kagoro", "Soba"]),
        StateRecord::new("Kano", &["Wudil", "Gaya", "Rano", "Bichi"]),
        StateRecord::new("Katsina", &["Funtua", "Daura", "Malumfashi"]),
        StateRecord::new("Kebbi", &["Birnin Kebbi", "Argungu", "Yauri", "Zuru"]),
        StateRecord::new("Kogi", &["Lokoja", "Okene", "Kabba", "Idah", "Anyigba"]),
        StateRecord::new("Kwara", &["Ilorin", "Offa", "Jebba", "Omu-Aran"]),
        StateRecord::new(
            "Lagos",
            &["Ikeja", "Yaba", "Surulere", "Lekki", "Ikorodu", "Badagry", "Epe", "Apapa"],
        ),
        StateRecord::new("Nasarawa", &["Lafia", "Keffi", "Akwanga", "Karu"]),
        StateRecord::new("Niger", &["Minna", "Bida", "Suleja", "Kontagora"]),
        StateRecord::new("Ogun", &["Abeokuta", "Sagamu", "Ijebu Ode", "Ota", "Ilaro"]),
        StateRecord::new("Ondo", &["Akure", "Owo", "Okitipupa", "Ikare"]),
        StateRecord::new("Osun", &["Osogbo", "Ile-Ife", "Ilesa", "Ede", "Ikirun"]),
        StateRecord::new("Oyo", &["Ibadan", "Ogbomoso", "Iseyin", "Saki"]),
        StateRecord::new("Plateau", &["Jos", "Bukuru", "Pankshin", "Shendam"]),
        StateRecord::new(
            "Rivers",
            &["Port Harcourt", "Obio-Akpor", "Bonny", "Degema", "Eleme"],
        ),
        StateRecord::new("Sokoto", &["Wurno", "Tambuwal", "Illela"]),
        StateRecord::new("Taraba", &["Jalingo", "Wukari", "Bali", "Gembu"]),
        StateRecord::new("Yobe", &["Damaturu", "Potiskum", "Gashua", "Nguru"]),
        StateRecord::new("Zamfara", &["Gusau", "Kaura Namoda", "Talata Mafara"]),
    ]
}

/// Common abbreviations and alternate spellings, tested after state names
/// and before city names, in declaration order
fn nigeria_aliases() -> Vec<(String, String)> {
    [
        ("fct", "Federal Capital Territory"),
        ("abuja", "Federal Capital Territory"),
        ("eko", "Lagos"),
        ("benin", "Edo"),
        ("ph", "Rivers"),
        ("port-harcourt", "Rivers"),
    ]
    .iter()
    .map(|(alias, state)| (alias.to_string(), state.to_string()))
    .collect()
}

/// One-way road distance (km) from the Lagos reference point to each state.
///
/// The reference state itself has no entry; Lagos-to-Lagos deliveries are
/// handled by the same-state table.
fn distances_from_lagos() -> Vec<(String, f64)> {
    [
        ("Abia", 630.0),
        ("Adamawa", 1420.0),
        ("Akwa Ibom", 700.0),
        ("Anambra", 480.0),
        ("Bauchi", 1180.0),
        ("Bayelsa", 560.0),
        ("Benue", 830.0),
        ("Borno", 1570.0),
        ("Cross River", 790.0),
        ("Delta", 400.0),
        ("Ebonyi", 640.0),
        ("Edo", 320.0),
        ("Ekiti", 340.0),
        ("Enugu", 550.0),
        ("Federal Capital Territory", 760.0),
        ("Gombe", 1280.0),
        ("Imo", 540.0),
        ("Jigawa", 1160.0),
        ("Kaduna", 880.0),
        ("Kano", 1050.0),
        ("Katsina", 1190.0),
        ("Kebbi", 1020.0),
        ("Kogi", 450.0),
        ("Kwara", 300.0),
        ("Nasarawa", 820.0),
        ("Niger", 680.0),
        ("Ogun", 80.0),
        ("Ondo", 300.0),
        ("Osun", 220.0),
        ("Oyo", 130.0),
        ("Plateau", 1010.0),
        ("Rivers", 610.0),
        ("Sokoto", 1230.0),
        ("Taraba", 1200.0),
        ("Yobe", 1440.0),
        ("Zamfara", 1090.0),
    ]
    .iter()
    .map(|(state, km)| (state.to_string(), *km))
    .collect()
}

/// Representative short intra-state distances for the busiest states.
/// Everything else falls back to [`DEFAULT_SAME_STATE_KM`].
fn same_state_distances() -> Vec<(String, f64)> {
    [
        ("Lagos", 25.0),
        ("Federal Capital Territory", 20.0),
        ("Rivers", 30.0),
        ("Kano", 20.0),
        ("Oyo", 30.0),
        ("Kaduna", 25.0),
    ]
    .iter()
    .map(|(state, km)| (state.to_string(), *km))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nigeria_gazetteer_loads() {
        let gazetteer = Gazetteer::nigeria();
        assert_eq!(gazetteer.states().len(), 37);
        assert_eq!(gazetteer.reference_state(), "Lagos");
    }

    #[test]
    fn test_state_names_unique() {
        let gazetteer = Gazetteer::nigeria();
        let mut names: Vec<&str> = gazetteer.states().iter().map(|s| s.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_every_non_reference_state_has_distance() {
        let gazetteer = Gazetteer::nigeria();
        for state in gazetteer.states() {
            if state.name == gazetteer.reference_state() {
                continue;
            }
            assert!(
                gazetteer.distance_from_reference(&state.name).is_some(),
                "missing distance for {}",
                state.name
            );
        }
    }

    #[test]
    fn test_known_distances() {
        let gazetteer = Gazetteer::nigeria();
        assert_eq!(gazetteer.distance_from_reference("Kano"), Some(1050.0));
        assert_eq!(gazetteer.distance_from_reference("Ogun"), Some(80.0));
        assert_eq!(gazetteer.distance_from_reference("Lagos"), None);
    }

    #[test]
    fn test_same_state_distances() {
        let gazetteer = Gazetteer::nigeria();
        assert_eq!(gazetteer.same_state_distance("Lagos"), 25.0);
        // No explicit entry, falls back to the default
        assert_eq!(gazetteer.same_state_distance("Ebonyi"), DEFAULT_SAME_STATE_KM);
    }

    #[test]
    #[should_panic(expected = "alias 'px' targets unknown state")]
    fn test_alias_to_unknown_state_panics() {
        Gazetteer::new(
            vec![StateRecord::new("Lagos", &["Ikeja"])],
            "Lagos",
            vec![("px".to_string(), "Atlantis".to_string())],
            vec![],
            vec![],
        );
    }

    #[test]
    #[should_panic(expected = "duplicate state name")]
    fn test_duplicate_state_panics() {
        Gazetteer::new(
            vec![
                StateRecord::new("Lagos", &["Ikeja"]),
                StateRecord::new("Lagos", &["Yaba"]),
            ],
            "Lagos",
            vec![],
            vec![],
            vec![],
        );
    }
}
