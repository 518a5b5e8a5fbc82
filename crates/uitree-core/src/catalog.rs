//! Built-in component catalog for the todo application

use crate::registry::{ComponentCategory, ComponentDetails, PropDefinition};
use crate::tree::UiTree;
use serde_json::json;

use ComponentCategory::{Display, Input, Layout, Todo};

fn class_name() -> PropDefinition {
    PropDefinition::new("className", "string", "Additional CSS classes")
}

fn disabled(what: &str) -> PropDefinition {
    PropDefinition::new("disabled", "boolean", format!("Whether {what} is disabled"))
        .with_default(false)
}

/// Components registered by [`ComponentRegistry::with_defaults`]
///
/// [`ComponentRegistry::with_defaults`]: crate::ComponentRegistry::with_defaults
#[must_use]
pub fn default_components() -> Vec<ComponentDetails> {
    vec![
        // Layout
        ComponentDetails::new(
            "Container",
            "Flex container with configurable direction and spacing",
            Layout,
            true,
        )
        .with_props(vec![
            PropDefinition::new("direction", "'row' | 'column'", "Flex direction")
                .with_default("column"),
            PropDefinition::new("gap", "number", "Gap between children in pixels").with_default(16),
            PropDefinition::new("padding", "number", "Padding in pixels").with_default(0),
            class_name(),
        ])
        .with_example(
            "Vertical stack with gap",
            UiTree::new("Container")
                .with_prop("direction", "column")
                .with_prop("gap", 16)
                .with_children(vec![]),
        ),
        ComponentDetails::new("Card", "Bordered card container with optional header", Layout, true)
            .with_props(vec![
                PropDefinition::new("title", "string", "Card header title"),
                PropDefinition::new("padding", "number", "Internal padding").with_default(16),
                class_name(),
            ])
            .with_example(
                "Card with title",
                UiTree::new("Card")
                    .with_prop("title", "My Tasks")
                    .with_prop("padding", 16)
                    .with_children(vec![]),
            ),
        ComponentDetails::new("Divider", "Horizontal or vertical divider line", Layout, false)
            .with_props(vec![
                PropDefinition::new("orientation", "'horizontal' | 'vertical'", "Divider direction")
                    .with_default("horizontal"),
                class_name(),
            ])
            .with_example(
                "Horizontal divider",
                UiTree::new("Divider").with_prop("orientation", "horizontal"),
            ),
        // Input
        ComponentDetails::new("TextInput", "Single-line text input field", Input, false)
            .with_props(vec![
                PropDefinition::new("value", "string", "Current input value").with_default(""),
                PropDefinition::new("placeholder", "string", "Placeholder text"),
                PropDefinition::new("onChange", "(value: string) => void", "Change handler"),
                disabled("input"),
                class_name(),
            ])
            .with_example(
                "Task input field",
                UiTree::new("TextInput").with_prop("placeholder", "What needs to be done?"),
            ),
        ComponentDetails::new("Checkbox", "Boolean toggle checkbox with optional label", Input, false)
            .with_props(vec![
                PropDefinition::new("checked", "boolean", "Whether checkbox is checked")
                    .with_default(false),
                PropDefinition::new("label", "string", "Label text"),
                PropDefinition::new("onChange", "(checked: boolean) => void", "Change handler"),
                disabled("checkbox"),
                class_name(),
            ])
            .with_example(
                "Task completion checkbox",
                UiTree::new("Checkbox")
                    .with_prop("checked", false)
                    .with_prop("label", "Complete task"),
            ),
        ComponentDetails::new("Select", "Dropdown selection input", Input, false)
            .with_props(vec![
                PropDefinition::new("value", "string", "Selected value"),
                PropDefinition::new(
                    "options",
                    "Array<{value: string, label: string}>",
                    "Available options",
                )
                .required(),
                PropDefinition::new("onChange", "(value: string) => void", "Change handler"),
                PropDefinition::new("placeholder", "string", "Placeholder when no selection"),
                disabled("select"),
                class_name(),
            ])
            .with_example(
                "Priority selector",
                UiTree::new("Select")
                    .with_prop("placeholder", "Select priority")
                    .with_prop(
                        "options",
                        json!([
                            {"value": "low", "label": "Low"},
                            {"value": "medium", "label": "Medium"},
                            {"value": "high", "label": "High"}
                        ]),
                    ),
            ),
        ComponentDetails::new("DatePicker", "Date selection input", Input, false)
            .with_props(vec![
                PropDefinition::new("value", "string", "Selected date (ISO format)"),
                PropDefinition::new("onChange", "(date: string) => void", "Change handler"),
                PropDefinition::new("min", "string", "Minimum selectable date"),
                PropDefinition::new("max", "string", "Maximum selectable date"),
                disabled("picker"),
                class_name(),
            ])
            .with_example(
                "Due date picker",
                UiTree::new("DatePicker").with_prop("min", "2025-01-01"),
            ),
        ComponentDetails::new("Button", "Clickable button with variants", Input, false)
            .with_props(vec![
                PropDefinition::new("label", "string", "Button text").required(),
                PropDefinition::new("onClick", "() => void", "Click handler"),
                PropDefinition::new(
                    "variant",
                    "'primary' | 'secondary' | 'danger' | 'ghost'",
                    "Button style variant",
                )
                .with_default("primary"),
                PropDefinition::new("size", "'sm' | 'md' | 'lg'", "Button size").with_default("md"),
                disabled("button"),
                class_name(),
            ])
            .with_example(
                "Add task button",
                UiTree::new("Button")
                    .with_prop("label", "Add Task")
                    .with_prop("variant", "primary"),
            ),
        // Display
        ComponentDetails::new("Text", "Text display with styling options", Display, false)
            .with_props(vec![
                PropDefinition::new("content", "string", "Text content to display").required(),
                PropDefinition::new(
                    "variant",
                    "'body' | 'heading' | 'caption' | 'label'",
                    "Text style variant",
                )
                .with_default("body"),
                PropDefinition::new("bold", "boolean", "Whether text is bold").with_default(false),
                PropDefinition::new("muted", "boolean", "Whether text is muted/gray")
                    .with_default(false),
                class_name(),
            ])
            .with_example(
                "Section heading",
                UiTree::new("Text")
                    .with_prop("content", "My Tasks")
                    .with_prop("variant", "heading"),
            ),
        ComponentDetails::new("Badge", "Small status indicator badge", Display, false)
            .with_props(vec![
                PropDefinition::new("label", "string", "Badge text").required(),
                PropDefinition::new(
                    "variant",
                    "'default' | 'success' | 'warning' | 'error' | 'info'",
                    "Badge color variant",
                )
                .with_default("default"),
                class_name(),
            ])
            .with_example(
                "High priority badge",
                UiTree::new("Badge")
                    .with_prop("label", "High")
                    .with_prop("variant", "error"),
            ),
        ComponentDetails::new("Icon", "Icon display from icon set", Display, false)
            .with_props(vec![
                PropDefinition::new(
                    "name",
                    "string",
                    "Icon name (check, trash, plus, calendar, etc.)",
                )
                .required(),
                PropDefinition::new("size", "number", "Icon size in pixels").with_default(20),
                class_name(),
            ])
            .with_example(
                "Checkmark icon",
                UiTree::new("Icon").with_prop("name", "check").with_prop("size", 16),
            ),
        // Todo
        ComponentDetails::new("TodoApp", "Main container for the Todo application", Todo, true)
            .with_props(vec![
                PropDefinition::new("title", "string", "App title").with_default("Todo"),
                PropDefinition::new("showStats", "boolean", "Whether to show task statistics")
                    .with_default(false),
                class_name(),
            ])
            .with_example(
                "Default Todo app",
                UiTree::new("TodoApp")
                    .with_prop("title", "My Tasks")
                    .with_children(vec![UiTree::new("TaskInput"), UiTree::new("TaskList")]),
            ),
        ComponentDetails::new("TaskList", "List container for displaying tasks", Todo, true)
            .with_props(vec![
                PropDefinition::new("filter", "'all' | 'active' | 'completed'", "Task filter")
                    .with_default("all"),
                PropDefinition::new("sortBy", "'createdAt' | 'dueDate' | 'priority'", "Sort order")
                    .with_default("createdAt"),
                PropDefinition::new("sortOrder", "'asc' | 'desc'", "Sort direction")
                    .with_default("desc"),
                class_name(),
            ])
            .with_example(
                "Active tasks sorted by due date",
                UiTree::new("TaskList")
                    .with_prop("filter", "active")
                    .with_prop("sortBy", "dueDate")
                    .with_prop("sortOrder", "asc"),
            ),
        ComponentDetails::new(
            "TaskItem",
            "Individual task display with completion toggle and delete",
            Todo,
            false,
        )
        .with_props(vec![
            PropDefinition::new("task", "Task", "The task data to display").required(),
            PropDefinition::new("onToggle", "(id: string) => void", "Toggle completion handler")
                .required(),
            PropDefinition::new("onDelete", "(id: string) => void", "Delete handler").required(),
            PropDefinition::new("showDueDate", "boolean", "Show due date field").with_default(false),
            PropDefinition::new("showPriority", "boolean", "Show priority indicator")
                .with_default(false),
            PropDefinition::new("showNotes", "boolean", "Show notes field").with_default(false),
            class_name(),
        ])
        .with_example(
            "Task with priority and due date",
            UiTree::new("TaskItem")
                .with_prop("showDueDate", true)
                .with_prop("showPriority", true),
        ),
        ComponentDetails::new("TaskInput", "Input component for creating new tasks", Todo, false)
            .with_props(vec![
                PropDefinition::new("placeholder", "string", "Input placeholder")
                    .with_default("What needs to be done?"),
                PropDefinition::new("onSubmit", "(title: string) => void", "Submit handler"),
                PropDefinition::new("showPriorityPicker", "boolean", "Show priority selector")
                    .with_default(false),
                PropDefinition::new("showDueDatePicker", "boolean", "Show due date picker")
                    .with_default(false),
                class_name(),
            ])
            .with_example(
                "Full-featured task input",
                UiTree::new("TaskInput")
                    .with_prop("showPriorityPicker", true)
                    .with_prop("showDueDatePicker", true),
            ),
        ComponentDetails::new(
            "TaskFilter",
            "Filter buttons for All/Active/Completed tasks",
            Todo,
            false,
        )
        .with_props(vec![
            PropDefinition::new(
                "current",
                "'all' | 'active' | 'completed'",
                "Currently active filter",
            )
            .with_default("all"),
            PropDefinition::new(
                "onChange",
                "(filter: 'all' | 'active' | 'completed') => void",
                "Filter change handler",
            ),
            class_name(),
        ])
        .with_example(
            "Task filter buttons",
            UiTree::new("TaskFilter").with_prop("current", "all"),
        ),
        ComponentDetails::new("TaskStats", "Task count statistics display", Todo, false)
            .with_props(vec![
                PropDefinition::new("totalCount", "number", "Total task count"),
                PropDefinition::new("completedCount", "number", "Completed task count"),
                PropDefinition::new("activeCount", "number", "Active task count"),
                class_name(),
            ])
            .with_example("Task statistics", UiTree::new("TaskStats")),
    ]
}
