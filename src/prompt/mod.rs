/// Fixed delimiter placed on its own line before and after the user's text.
pub const DELIMITER: &str = "---";

fn persona() -> &'static str {
r#"Act as a senior DevOps engineer specializing in Ansible automation.
Your task is to generate a complete and professional Ansible role based on the user's request."#
}

fn layout_rules() -> &'static str {
r#"**Instructions:**
1.  Infer the role name from the user's request (e.g., 'nginx', 'docker', 'mysql'). If it's complex, use a descriptive name. The role name must be the top-level directory of every path.
2.  Create the conventional Ansible role directory structure.
3.  Generate the content for all necessary files, including:
    - `defaults/main.yml`: default variables.
    - `vars/main.yml`: non-overridable variables, if needed.
    - `tasks/main.yml`: the entry point for tasks. Split complex logic into included task files (e.g., `tasks/install.yml`, `tasks/configure.yml`).
    - `handlers/main.yml`: service restarts and other handlers.
    - `templates/...`: any template files (configuration files, virtual hosts). Use the .j2 extension.
    - `meta/main.yml`: role metadata, including dependencies if any can be inferred.
4.  Ensure all YAML is valid and all Ansible modules are used correctly.
5.  The code should be well-commented and follow Ansible best practices."#
}

fn output_contract() -> &'static str {
r#"**Output Format:**
Return a single, valid JSON object. The keys must be the full relative file paths (e.g., 'rolename/tasks/main.yml'), using '/' separators, with no leading slash. The values must be the complete content of each file as a string.
Do not include any explanations, markdown formatting, or code fences outside of the JSON object. The entire response must be only the JSON object itself."#
}

/// Render the generation prompt for a role description.
///
/// The description must already be trimmed and non-empty; it is embedded
/// verbatim between two `---` lines and appears nowhere else.
pub fn build(description: &str) -> String {
    format!(
"{persona}

**User's Request:**
{delim}
{description}
{delim}

{layout_rules}

{output_contract}
",
        persona = persona(),
        delim = DELIMITER,
        description = description,
        layout_rules = layout_rules(),
        output_contract = output_contract(),
    )
}
