use super::Host;
use crate::Result;
use crate::fields::{FieldGroup, FieldRegistry};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct FieldsArgs {
    /// Only list fields of this group
    #[arg(long, value_name = "GROUP", ignore_case = true)]
    pub group: Option<FieldGroupArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FieldGroupArg {
    Item,
    Reading,
    Report,
}

impl From<FieldGroupArg> for FieldGroup {
    fn from(value: FieldGroupArg) -> Self {
        match value {
            FieldGroupArg::Item => Self::Item,
            FieldGroupArg::Reading => Self::Reading,
            FieldGroupArg::Report => Self::Report,
        }
    }
}

#[expect(clippy::unnecessary_wraps, reason = "Consistent interface with other subcommands")]
pub fn list_fields<H: Host>(host: &mut H, args: &FieldsArgs) -> Result<()> {
    let registry = FieldRegistry::default();
    let wanted = args.group.map(FieldGroup::from);

    let mut out = host.output();
    for def in registry.fields() {
        if wanted.is_some_and(|group| group != def.group) {
            continue;
        }

        let _ = writeln!(out, "{:<28} {:<8} {}", def.name, def.group, def.description);
    }

    if wanted.is_none() {
        let _ = writeln!(out, "{:<28} {:<8} {}", "metadata:<name>", "Metadata", "Resource metadata, any source convention");
        let _ = writeln!(out, "{:<28} {:<8} {}", "image_metadata:<name>", "Metadata", "Image metadata (image_meta.<name>)");
    }

    Ok(())
}
