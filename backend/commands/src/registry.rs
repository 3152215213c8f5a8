/// Slash command registry built from the configured presentation text.
use bunwatch_config::Presentation;
use bunwatch_core::CaptureKind;

use crate::types::CommandDef;

/// Suffix of the clip command name.
pub const CLIP_SUFFIX: &str = "-gif";

/// Build the two capture commands for `presentation`.
pub fn build_commands(presentation: &Presentation) -> Vec<CommandDef> {
    let prefix = presentation.command_prefix.as_str();
    let subject = presentation.subject.as_str();
    vec![
        CommandDef {
            name: prefix.to_string(),
            description: format!("Creep on the {subject}"),
            kind: CaptureKind::Snapshot,
        },
        CommandDef {
            name: format!("{prefix}{CLIP_SUFFIX}"),
            description: format!("Creep on the {subject} with a short clip"),
            kind: CaptureKind::Clip,
        },
    ]
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new(presentation: &Presentation) -> Self {
        Self {
            commands: build_commands(presentation),
        }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    /// Map an inbound command name (with or without the slash) to its kind.
    pub fn resolve(&self, name: &str) -> Option<CaptureKind> {
        let name = name.trim().trim_start_matches('/');
        self.commands
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.kind)
    }

    pub fn find_by_kind(&self, kind: CaptureKind) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presentation() -> Presentation {
        Presentation {
            activity: "two little idiots".into(),
            subject: "buns".into(),
            command_prefix: "creep".into(),
            snapshot_filename: "creep.jpg".into(),
        }
    }

    #[test]
    fn builds_prefix_commands() {
        let registry = CommandRegistry::new(&presentation());
        let names: Vec<_> = registry.all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["creep", "creep-gif"]);
        assert_eq!(registry.all()[0].description, "Creep on the buns");
        assert_eq!(registry.find_by_kind(CaptureKind::Clip).unwrap().slash(), "/creep-gif");
    }

    #[test]
    fn resolves_names() {
        let registry = CommandRegistry::new(&presentation());
        assert_eq!(registry.resolve("creep"), Some(CaptureKind::Snapshot));
        assert_eq!(registry.resolve("/creep-gif"), Some(CaptureKind::Clip));
        assert_eq!(registry.resolve("CREEP"), Some(CaptureKind::Snapshot));
        assert_eq!(registry.resolve("creep-video"), None);
        assert_eq!(registry.resolve(""), None);
    }

    #[test]
    fn follows_custom_prefix() {
        let mut p = presentation();
        p.command_prefix = "peek".into();
        let registry = CommandRegistry::new(&p);
        assert_eq!(registry.resolve("peek-gif"), Some(CaptureKind::Clip));
        assert_eq!(registry.resolve("creep"), None);
    }
}
