mod builtin;
mod field;

pub use field::{write_sample, CodeField, Form, CODE_FIELD};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use miette::Result;

use crate::error;

/// Subject of a sample program. Ordering follows the page's menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Area,
    Data,
    Power,
    AddTwo,
}

/// Instruction-set flavor a sample is written for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flavor {
    Intel,
    MipsAsm,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Area, Topic::Data, Topic::Power, Topic::AddTwo];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Data => "data",
            Self::Power => "power",
            Self::AddTwo => "addTwo",
        }
    }

    /// Name of the page function which loads this sample.
    pub fn function_name(self) -> &'static str {
        match self {
            Self::Area => "area_fp",
            Self::Data => "data_fp",
            Self::Power => "power_fp",
            Self::AddTwo => "addTwo_fp",
        }
    }

    /// File holding this sample inside a flavor directory of a sample tree.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Area => "fp_area.asm",
            Self::Data => "fp_data.asm",
            Self::Power => "fp_power.asm",
            Self::AddTwo => "fp_sum_test.asm",
        }
    }

    fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.file_name() == name)
    }
}

impl Flavor {
    pub const ALL: [Flavor; 2] = [Flavor::Intel, Flavor::MipsAsm];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Intel => "intel",
            Self::MipsAsm => "mips_asm",
        }
    }

    /// Directory of a sample tree holding programs of this flavor.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Intel => "Intel",
            Self::MipsAsm => "MIPS_ASM",
        }
    }

    fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flavor| flavor.dir_name() == name)
    }
}

impl FromStr for Topic {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "area" => Ok(Self::Area),
            "data" => Ok(Self::Data),
            "power" => Ok(Self::Power),
            "addTwo" | "add_two" => Ok(Self::AddTwo),
            _ => Err(format!("Unknown topic '{}'", s)),
        }
    }
}

impl FromStr for Flavor {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intel" => Ok(Self::Intel),
            "mips_asm" => Ok(Self::MipsAsm),
            _ => Err(format!("Unknown flavor '{}'", s)),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Immutable table of sample programs keyed by (topic, flavor).
///
/// Contents are opaque text: nothing here parses or checks the assembly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<(Topic, Flavor), Cow<'static, str>>,
}

impl Catalog {
    /// Samples bundled with the emulator page.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        for topic in Topic::ALL {
            for flavor in Flavor::ALL {
                if let Some(text) = builtin::sample(topic, flavor) {
                    entries.insert((topic, flavor), Cow::Borrowed(text));
                }
            }
        }
        Catalog { entries }
    }

    /// Load a sample tree laid out as `<root>/<Intel|MIPS_ASM>/fp_<name>.asm`.
    ///
    /// Files are taken verbatim. Anything that doesn't name a known flavor
    /// directory and topic file is skipped, and a missing file leaves that
    /// pair undefined.
    pub fn from_dir(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(error::catalog_missing_dir(root));
        }
        let pattern = format!(
            "{}/*/fp_*.asm",
            glob::Pattern::escape(&root.to_string_lossy())
        );
        let paths = glob::glob(&pattern).map_err(error::catalog_pattern)?;

        let mut entries = BTreeMap::new();
        for path in paths {
            let path = path.map_err(error::catalog_glob)?;
            let flavor = path
                .parent()
                .and_then(Path::file_name)
                .and_then(|name| Flavor::from_dir_name(&name.to_string_lossy()));
            let topic = path
                .file_name()
                .and_then(|name| Topic::from_file_name(&name.to_string_lossy()));
            let (Some(topic), Some(flavor)) = (topic, flavor) else {
                tracing::debug!(path = %path.display(), "skipping unrecognised sample file");
                continue;
            };
            let text = fs::read_to_string(&path).map_err(|e| error::catalog_read(&path, e))?;
            entries.insert((topic, flavor), Cow::Owned(text));
        }
        Ok(Catalog { entries })
    }

    pub fn get(&self, topic: Topic, flavor: Flavor) -> Option<&str> {
        self.entries.get(&(topic, flavor)).map(|text| text.as_ref())
    }

    /// Look up by raw flavor tag. Unknown or undefined flavors yield `""`.
    pub fn lookup(&self, topic: Topic, flavor: &str) -> &str {
        flavor
            .parse::<Flavor>()
            .ok()
            .and_then(|flavor| self.get(topic, flavor))
            .unwrap_or("")
    }

    /// Flavors defined for `topic`, in declaration order.
    pub fn flavors(&self, topic: Topic) -> impl Iterator<Item = Flavor> + '_ {
        Flavor::ALL
            .into_iter()
            .filter(move |flavor| self.entries.contains_key(&(topic, *flavor)))
    }

    /// Every defined pair, ordered by topic then flavor.
    pub fn iter(&self) -> impl Iterator<Item = (Topic, Flavor, &str)> {
        self.entries
            .iter()
            .map(|((topic, flavor), text)| (*topic, *flavor, text.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_lookup(topic: Topic, flavor: &str) -> &'static str {
    flavor
        .parse::<Flavor>()
        .ok()
        .and_then(|flavor| builtin::sample(topic, flavor))
        .unwrap_or("")
}

/// Area of a rectangle.
pub fn area_fp(flavor: &str) -> &'static str {
    builtin_lookup(Topic::Area, flavor)
}

/// Data declarations and register-relative stores.
pub fn data_fp(flavor: &str) -> &'static str {
    builtin_lookup(Topic::Data, flavor)
}

/// Raise a number to a power with a subroutine loop.
pub fn power_fp(flavor: &str) -> &'static str {
    builtin_lookup(Topic::Power, flavor)
}

/// Add a constant to a number and store the sum. Intel only.
pub fn add_two_fp(flavor: &str) -> &'static str {
    builtin_lookup(Topic::AddTwo, flavor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_lookups() {
        assert!(area_fp("intel").lines().any(|l| l.trim() == "imul R6, [wide]"));
        assert_eq!(area_fp("unknown"), "");
        assert!(power_fp("mips_asm").contains("JAL 0x1000040"));
        assert_eq!(add_two_fp("mips_asm"), "");
        assert!(data_fp("mips_asm").contains("z: .double 20.555"));
    }

    #[test]
    fn flavor_tags_are_case_sensitive() {
        assert_eq!(area_fp("Intel"), "");
        assert_eq!(area_fp("att"), "");
        assert_eq!(area_fp(""), "");
    }

    #[test]
    fn builtin_catalog_matches_named_lookups() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 7);
        for topic in Topic::ALL {
            for flavor in Flavor::ALL {
                let expected = builtin::sample(topic, flavor).unwrap_or("");
                assert_eq!(catalog.lookup(topic, flavor.tag()), expected);
            }
        }
        assert_eq!(catalog.lookup(Topic::Power, "riscv"), "");
    }

    #[test]
    fn flavors_per_topic() {
        let catalog = Catalog::builtin();
        let flavors: Vec<_> = catalog.flavors(Topic::Area).collect();
        assert_eq!(flavors, [Flavor::Intel, Flavor::MipsAsm]);
        let flavors: Vec<_> = catalog.flavors(Topic::AddTwo).collect();
        assert_eq!(flavors, [Flavor::Intel]);
    }

    #[test]
    fn iteration_order() {
        let order: Vec<_> = Catalog::builtin()
            .iter()
            .map(|(topic, flavor, _)| format!("{topic}/{flavor}"))
            .collect();
        assert_eq!(
            order,
            [
                "area/intel",
                "area/mips_asm",
                "data/intel",
                "data/mips_asm",
                "power/intel",
                "power/mips_asm",
                "addTwo/intel",
            ]
        );
    }

    #[test]
    fn parse_tags() {
        assert_eq!("addTwo".parse::<Topic>(), Ok(Topic::AddTwo));
        assert_eq!("add_two".parse::<Topic>(), Ok(Topic::AddTwo));
        assert!("sqrt".parse::<Topic>().is_err());
        assert_eq!("mips_asm".parse::<Flavor>(), Ok(Flavor::MipsAsm));
        assert!("mips_mml".parse::<Flavor>().is_err());
    }

    #[test]
    fn loads_sample_tree() {
        let root = tempfile::tempdir().unwrap();
        let intel = root.path().join("Intel");
        let mips = root.path().join("MIPS_ASM");
        let att = root.path().join("ATT");
        fs::create_dir_all(&intel).unwrap();
        fs::create_dir_all(&mips).unwrap();
        fs::create_dir_all(&att).unwrap();
        fs::write(intel.join("fp_area.asm"), "; intel area\n").unwrap();
        fs::write(intel.join("fp_loop.asm"), "; not a topic\n").unwrap();
        fs::write(mips.join("fp_power.asm"), "; mips power").unwrap();
        fs::write(att.join("fp_area.asm"), "; att area\n").unwrap();

        let catalog = Catalog::from_dir(root.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup(Topic::Area, "intel"), "; intel area\n");
        assert_eq!(catalog.lookup(Topic::Power, "mips_asm"), "; mips power");
        assert_eq!(catalog.lookup(Topic::Area, "mips_asm"), "");
    }

    #[test]
    fn missing_sample_tree() {
        let root = tempfile::tempdir().unwrap();
        assert!(Catalog::from_dir(&root.path().join("nope")).is_err());
    }
}
