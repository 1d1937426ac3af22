use crate::{
    domain::{Delimiter, Labels, Selection},
    export::{paragraphs, split_name},
};

/// Renders a selection as Markdown.
///
/// The document opens with `# {title} - {selection}`. Each included
/// principle is a level-one heading, each checked requirement a level-two
/// heading followed by its guidelines. When nothing is included a single
/// explanatory line follows the title.
#[must_use]
pub fn render(selection: &Selection<'_>, labels: &Labels) -> String {
    let mut markdown = format!("# {} - {}\n\n", labels.title, labels.selection);
    let mut has_content = false;

    for (principle, requirements) in selection.included() {
        has_content = true;

        let (name, explanation) = split_name(principle.name(), Delimiter::Period);
        markdown.push_str(&format!("# {}: {name}\n\n", labels.principle));
        if !explanation.is_empty() {
            markdown.push_str(&format!("{explanation}\n\n"));
        }

        for requirement in requirements {
            let (name, explanation) = split_name(requirement.name(), Delimiter::Colon);
            markdown.push_str(&format!("## {}: {name}\n\n", labels.requirement));
            if !explanation.is_empty() {
                markdown.push_str(&format!("{explanation}\n\n"));
            }
            markdown.push_str(&format!(
                "### {}:\n{}\n\n",
                labels.guidelines,
                paragraphs(requirement.guidelines())
            ));
        }
    }

    if !has_content {
        markdown.push_str(&labels.nothing_selected);
        markdown.push('\n');
    }

    markdown
}
