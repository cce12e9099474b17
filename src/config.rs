use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Env var naming an explicit overlay file, checked before the XDG-style default.
pub const CONFIG_ENV_VAR: &str = "CC_GUARDRAILS_CONFIG";

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub wrappers: WrapperConfig,
    #[serde(default)]
    pub branches: BranchConfig,
    #[serde(default)]
    pub commit: CommitConfig,
    #[serde(default)]
    pub deletion: DeletionConfig,
    #[serde(default)]
    pub infra: InfraConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Ceiling for a single git query, in milliseconds.
    #[serde(default = "default_git_timeout_ms")]
    pub git_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub log_decisions: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            git_timeout_ms: default_git_timeout_ms(),
            log_decisions: true,
            log_level: default_log_level(),
        }
    }
}

fn default_git_timeout_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".into()
}

/// Commands that execute their arguments as a subcommand.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WrapperConfig {
    #[serde(default)]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BranchConfig {
    /// Branches whose direct mutation (commit/push) needs a human in the loop.
    #[serde(default)]
    pub protected: Vec<String>,
}

impl BranchConfig {
    pub fn is_protected(&self, branch: &str) -> bool {
        !branch.is_empty() && self.protected.iter().any(|b| b == branch)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CommitConfig {
    /// Require the message-approval workflow even off protected branches.
    #[serde(default)]
    pub require_approval: bool,
}

/// Which containment check the deletion guard applies to each target.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeletionMode {
    /// Target must live inside a git working tree.
    #[default]
    TrackedTree,
    /// Target must live under `allowed_root`.
    AllowedRoot,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DeletionConfig {
    #[serde(default)]
    pub primitives: Vec<String>,
    #[serde(default)]
    pub mode: DeletionMode,
    #[serde(default)]
    pub allowed_root: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct InfraConfig {
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub destructive_subcommands: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct InstallConfig {
    #[serde(default)]
    pub managers: Vec<InstallManager>,
}

/// One package-manager family and how it spells "add a dependency".
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct InstallManager {
    pub name: String,
    /// Executable names, e.g. `["pip", "pip3"]`.
    pub commands: Vec<String>,
    /// Verbs that add packages when followed by a package argument.
    pub verbs: Vec<String>,
    /// Flags whose value is a file to install from (not a package name).
    #[serde(default)]
    pub file_flags: Vec<String>,
    /// Other flags that take a separate value (`--prefix web`,
    /// `--index-url URL`).
    #[serde(default)]
    pub value_flags: Vec<String>,
    /// Treat `.`, `./x`, `../x` and absolute paths as local installs.
    #[serde(default)]
    pub local_paths_ignored: bool,
}

impl InstallManager {
    /// `flag` is followed by a separate value rather than a package.
    pub fn takes_value(&self, flag: &str) -> bool {
        self.file_flags.iter().chain(&self.value_flags).any(|f| f == flag)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompletionConfig {
    /// Extensions that mark a file as "real code" (with leading dot).
    #[serde(default)]
    pub code_extensions: Vec<String>,
    /// How many dirty paths a block message lists before summarising.
    #[serde(default = "default_max_listed")]
    pub max_listed: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            code_extensions: Vec::new(),
            max_listed: default_max_listed(),
        }
    }
}

fn default_max_listed() -> usize {
    10
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    wrappers: WrappersOverlay,
    #[serde(default)]
    branches: BranchesOverlay,
    #[serde(default)]
    commit: CommitOverlay,
    #[serde(default)]
    deletion: DeletionOverlay,
    #[serde(default)]
    infra: InfraOverlay,
    #[serde(default)]
    install: InstallOverlay,
    #[serde(default)]
    completion: CompletionOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    git_timeout_ms: Option<u64>,
    log_decisions: Option<bool>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct WrappersOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    commands: Vec<String>,
    #[serde(default)]
    remove_commands: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct BranchesOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    protected: Vec<String>,
    #[serde(default)]
    remove_protected: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CommitOverlay {
    require_approval: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct DeletionOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    primitives: Vec<String>,
    #[serde(default)]
    remove_primitives: Vec<String>,
    mode: Option<DeletionMode>,
    allowed_root: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct InfraOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    tools: Vec<String>,
    #[serde(default)]
    destructive_subcommands: Vec<String>,
    #[serde(default)]
    remove_tools: Vec<String>,
    #[serde(default)]
    remove_destructive_subcommands: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct InstallOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    managers: Vec<InstallManager>,
    /// Manager names to drop.
    #[serde(default)]
    remove_managers: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CompletionOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    code_extensions: Vec<String>,
    #[serde(default)]
    remove_code_extensions: Vec<String>,
    max_listed: Option<usize>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

/// Same as `merge_list`, keyed by manager name. A user entry with an
/// existing name replaces the default entry in place.
fn merge_managers(
    base: &mut Vec<InstallManager>,
    add: Vec<InstallManager>,
    remove: &[String],
    replace: bool,
) {
    if replace {
        *base = add;
        return;
    }
    base.retain(|m| !remove.contains(&m.name));
    for manager in add {
        match base.iter_mut().find(|m| m.name == manager.name) {
            Some(existing) => *existing = manager,
            None => base.push(manager),
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the user overlay (if one exists)
    ///
    /// User config merges with defaults: lists extend, scalars override.
    /// Set `replace = true` in any section to replace its defaults entirely.
    /// Use `remove_<field>` lists to subtract specific items from defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Overlay location: `$CC_GUARDRAILS_CONFIG`, else
    /// `~/.config/cc-guardrails/config.toml`.
    pub fn overlay_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR)
            && !explicit.is_empty()
        {
            return Some(PathBuf::from(explicit));
        }
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config/cc-guardrails/config.toml"))
    }

    fn load_overlay() -> Option<ConfigOverlay> {
        let path = Self::overlay_path()?;
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("cc-guardrails: config parse error in {}: {e}", path.display());
                None
            }
        }
    }

    /// Render the effective configuration (for `--dump-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        let s = overlay.settings;
        if let Some(v) = s.git_timeout_ms {
            self.settings.git_timeout_ms = v;
        }
        if let Some(v) = s.log_decisions {
            self.settings.log_decisions = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }

        // Wrappers
        let w = overlay.wrappers;
        merge_list(
            &mut self.wrappers.commands,
            w.commands,
            &w.remove_commands,
            w.replace,
        );

        // Branches
        let b = overlay.branches;
        merge_list(
            &mut self.branches.protected,
            b.protected,
            &b.remove_protected,
            b.replace,
        );

        // Commit
        if let Some(v) = overlay.commit.require_approval {
            self.commit.require_approval = v;
        }

        // Deletion
        let d = overlay.deletion;
        merge_list(
            &mut self.deletion.primitives,
            d.primitives,
            &d.remove_primitives,
            d.replace,
        );
        if let Some(v) = d.mode {
            self.deletion.mode = v;
        }
        if let Some(v) = d.allowed_root {
            self.deletion.allowed_root = v;
        }

        // Infra
        let i = overlay.infra;
        merge_list(&mut self.infra.tools, i.tools, &i.remove_tools, i.replace);
        merge_list(
            &mut self.infra.destructive_subcommands,
            i.destructive_subcommands,
            &i.remove_destructive_subcommands,
            i.replace,
        );

        // Install
        let inst = overlay.install;
        merge_managers(
            &mut self.install.managers,
            inst.managers,
            &inst.remove_managers,
            inst.replace,
        );

        // Completion
        let c = overlay.completion;
        merge_list(
            &mut self.completion.code_extensions,
            c.code_extensions,
            &c.remove_code_extensions,
            c.replace,
        );
        if let Some(v) = c.max_listed {
            self.completion.max_listed = v;
        }
    }

    /// Apply an overlay from a TOML string.
    pub fn apply_overlay_str(&mut self, toml_str: &str) -> Result<(), toml::de::Error> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        self.apply_overlay(overlay);
        Ok(())
    }
}
