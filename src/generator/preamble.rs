//! Built-in preambles for the two named templates. Each configures
//! page/text/heading settings and defines the `admon(kind, body)` helper
//! every `AdmonitionParagraph` calls into.

use crate::generator::TemplateName;

const ADMON_HELPER: &str = r#"#let admon(kind, body) = {
  let labels = (
    NOTE: "Note",
    TIP: "Tip",
    IMPORTANT: "Important",
    CAUTION: "Caution",
    WARNING: "Warning",
  )
  block(
    width: 100%,
    inset: 8pt,
    radius: 4pt,
    stroke: 0.5pt + gray,
    fill: luma(245),
  )[*#labels.at(kind, default: kind)*: #body]
}
"#;

pub fn render(template: TemplateName) -> String {
    match template {
        TemplateName::Plain => format!(
            "#set page(margin: 2cm)\n#set text(size: 11pt)\n#set heading(numbering: none)\n\n{ADMON_HELPER}\n"
        ),
        TemplateName::Report => format!(
            "#set page(margin: 2.5cm, numbering: \"1\")\n#set text(size: 11pt, font: \"New Computer Modern\")\n#set heading(numbering: \"1.1.\")\n#set par(justify: true)\n\n{ADMON_HELPER}\n"
        ),
    }
}
