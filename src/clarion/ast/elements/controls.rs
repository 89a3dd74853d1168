//! UI structure nodes
//!
//! The window sub-grammar is shared verbatim between the declarations-only
//! and full program grammars: WINDOW/APPLICATION structures containing
//! menubars, toolbars, sheets/tabs, options, and controls, every one of
//! them carrying an attribute list.
//!
//! Syntax example:
//!     MainWin APPLICATION('Orders'),AT(,,400,300),SYSTEM,MAX
//!               MENUBAR
//!                 MENU('&File'),USE(?FileMenu)
//!                   ITEM('E&xit'),USE(?Exit),STD(STD:Close)
//!                 END
//!               END
//!               TOOLBAR
//!                 BUTTON('Open'),AT(2,2),USE(?OpenBtn)
//!               END
//!             END
//!
//! Unrecognized content inside any of these blocks becomes an opaque
//! [`UnknownContent`](super::attributes::UnknownContent) child instead of
//! aborting the block.

use serde::Serialize;

use super::super::range::Range;
use super::super::traits::{AstNode, Visitor};
use super::attributes::{Attribute, UnknownContent};
use super::expressions::Expression;

/// `Name WINDOW('title')...END` or `Name APPLICATION('title')...END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowDefinition {
    pub name: String,
    pub kind: WindowKind,
    pub title: Option<String>,
    pub attributes: Vec<Attribute>,
    pub body: Vec<UiElement>,
    pub location: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindowKind {
    Application,
    Window,
}

/// One element of a window/tab/option body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UiElement {
    Menubar(MenubarBlock),
    Toolbar(ToolbarBlock),
    Sheet(SheetBlock),
    Option(OptionBlock),
    Button(ButtonDefinition),
    Control(ControlBlock),
    Unknown(UnknownContent),
}

/// `MENUBAR [,attrs] entries END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenubarBlock {
    pub attributes: Vec<Attribute>,
    pub entries: Vec<MenuEntry>,
    pub location: Range,
}

/// One entry of a menubar or menu body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MenuEntry {
    Menu(MenuBlock),
    Item(ItemDefinition),
    Separator(Separator),
    Unknown(UnknownContent),
}

/// `MENU('text') [,attrs] entries END` — menus nest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuBlock {
    pub text: Option<String>,
    pub attributes: Vec<Attribute>,
    pub entries: Vec<MenuEntry>,
    pub location: Range,
}

/// `ITEM['(text)'] [,attrs]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDefinition {
    pub text: Option<String>,
    pub attributes: Vec<Attribute>,
    pub location: Range,
}

/// `SEPARATOR [,attrs]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Separator {
    pub location: Range,
}

/// `TOOLBAR [,attrs] entries END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolbarBlock {
    pub attributes: Vec<Attribute>,
    pub entries: Vec<ToolbarEntry>,
    pub location: Range,
}

/// One entry of a toolbar body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ToolbarEntry {
    Button(ButtonDefinition),
    Control(ControlBlock),
    Unknown(UnknownContent),
}

/// `BUTTON['(label)'] [,attrs]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonDefinition {
    pub label: Option<String>,
    pub attributes: Vec<Attribute>,
    pub location: Range,
}

/// `SHEET [,attrs] tabs END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetBlock {
    pub attributes: Vec<Attribute>,
    pub tabs: Vec<SheetEntry>,
    pub location: Range,
}

/// One entry of a sheet body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SheetEntry {
    Tab(TabBlock),
    Unknown(UnknownContent),
}

/// `TAB('text') [,attrs] body END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabBlock {
    pub text: Option<String>,
    pub attributes: Vec<Attribute>,
    pub body: Vec<UiElement>,
    pub location: Range,
}

/// `OPTION['(text)'] [,attrs] body END`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionBlock {
    pub text: Option<String>,
    pub attributes: Vec<Attribute>,
    pub body: Vec<UiElement>,
    pub location: Range,
}

/// A generic control: `ENTRY(@s20),AT(10,10),USE(LOC:Name)`.
///
/// Control types are not keywords — the name is whatever identifier opened
/// the element, so vendor control sets parse without grammar changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlBlock {
    pub name: String,
    /// Parenthesized arguments; omitted slots stay positional
    pub args: Vec<Option<Expression>>,
    pub attributes: Vec<Attribute>,
    pub location: Range,
}

// ----------------------------------------------------------------------------
// AstNode implementations
// ----------------------------------------------------------------------------

fn attrs_and<'a>(
    attributes: &'a [Attribute],
    rest: impl Iterator<Item = &'a dyn AstNode>,
) -> Vec<&'a dyn AstNode> {
    attributes
        .iter()
        .map(|a| a as &dyn AstNode)
        .chain(rest)
        .collect()
}

impl AstNode for WindowDefinition {
    fn node_type(&self) -> &'static str {
        "WindowDefinition"
    }
    fn display_label(&self) -> String {
        match &self.title {
            Some(title) => format!("{} ('{title}')", self.name),
            None => self.name.clone(),
        }
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_window_definition(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for element in &self.body {
            element.accept(visitor);
        }
        visitor.leave_window_definition(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        attrs_and(&self.attributes, self.body.iter().map(|e| e as &dyn AstNode))
    }
}

impl UiElement {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            UiElement::Menubar(e) => e,
            UiElement::Toolbar(e) => e,
            UiElement::Sheet(e) => e,
            UiElement::Option(e) => e,
            UiElement::Button(e) => e,
            UiElement::Control(e) => e,
            UiElement::Unknown(e) => e,
        }
    }
}

impl AstNode for UiElement {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for MenubarBlock {
    fn node_type(&self) -> &'static str {
        "MenubarBlock"
    }
    fn display_label(&self) -> String {
        "MENUBAR".to_string()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_menubar_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for entry in &self.entries {
            entry.accept(visitor);
        }
        visitor.leave_menubar_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        attrs_and(
            &self.attributes,
            self.entries.iter().map(|e| e as &dyn AstNode),
        )
    }
}

impl MenuEntry {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            MenuEntry::Menu(e) => e,
            MenuEntry::Item(e) => e,
            MenuEntry::Separator(e) => e,
            MenuEntry::Unknown(e) => e,
        }
    }
}

impl AstNode for MenuEntry {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for MenuBlock {
    fn node_type(&self) -> &'static str {
        "MenuBlock"
    }
    fn display_label(&self) -> String {
        self.text.clone().unwrap_or_else(|| "MENU".to_string())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_menu_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for entry in &self.entries {
            entry.accept(visitor);
        }
        visitor.leave_menu_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        attrs_and(
            &self.attributes,
            self.entries.iter().map(|e| e as &dyn AstNode),
        )
    }
}

impl AstNode for ItemDefinition {
    fn node_type(&self) -> &'static str {
        "ItemDefinition"
    }
    fn display_label(&self) -> String {
        self.text.clone().unwrap_or_else(|| "ITEM".to_string())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_item_definition(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes.iter().map(|a| a as &dyn AstNode).collect()
    }
}

impl AstNode for Separator {
    fn node_type(&self) -> &'static str {
        "Separator"
    }
    fn display_label(&self) -> String {
        "SEPARATOR".to_string()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_separator(self);
    }
}

impl AstNode for ToolbarBlock {
    fn node_type(&self) -> &'static str {
        "ToolbarBlock"
    }
    fn display_label(&self) -> String {
        "TOOLBAR".to_string()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_toolbar_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for entry in &self.entries {
            entry.accept(visitor);
        }
        visitor.leave_toolbar_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        attrs_and(
            &self.attributes,
            self.entries.iter().map(|e| e as &dyn AstNode),
        )
    }
}

impl ToolbarEntry {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            ToolbarEntry::Button(e) => e,
            ToolbarEntry::Control(e) => e,
            ToolbarEntry::Unknown(e) => e,
        }
    }
}

impl AstNode for ToolbarEntry {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for ButtonDefinition {
    fn node_type(&self) -> &'static str {
        "ButtonDefinition"
    }
    fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| "BUTTON".to_string())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_button_definition(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.attributes.iter().map(|a| a as &dyn AstNode).collect()
    }
}

impl AstNode for SheetBlock {
    fn node_type(&self) -> &'static str {
        "SheetBlock"
    }
    fn display_label(&self) -> String {
        "SHEET".to_string()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_sheet_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for tab in &self.tabs {
            tab.accept(visitor);
        }
        visitor.leave_sheet_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        attrs_and(&self.attributes, self.tabs.iter().map(|t| t as &dyn AstNode))
    }
}

impl SheetEntry {
    fn as_node(&self) -> &dyn AstNode {
        match self {
            SheetEntry::Tab(e) => e,
            SheetEntry::Unknown(e) => e,
        }
    }
}

impl AstNode for SheetEntry {
    fn node_type(&self) -> &'static str {
        self.as_node().node_type()
    }
    fn display_label(&self) -> String {
        self.as_node().display_label()
    }
    fn range(&self) -> &Range {
        self.as_node().range()
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        self.as_node().accept(visitor);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.as_node().child_nodes()
    }
}

impl AstNode for TabBlock {
    fn node_type(&self) -> &'static str {
        "TabBlock"
    }
    fn display_label(&self) -> String {
        self.text.clone().unwrap_or_else(|| "TAB".to_string())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_tab_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for element in &self.body {
            element.accept(visitor);
        }
        visitor.leave_tab_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        attrs_and(&self.attributes, self.body.iter().map(|e| e as &dyn AstNode))
    }
}

impl AstNode for OptionBlock {
    fn node_type(&self) -> &'static str {
        "OptionBlock"
    }
    fn display_label(&self) -> String {
        self.text.clone().unwrap_or_else(|| "OPTION".to_string())
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_option_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
        for element in &self.body {
            element.accept(visitor);
        }
        visitor.leave_option_block(self);
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        attrs_and(&self.attributes, self.body.iter().map(|e| e as &dyn AstNode))
    }
}

impl AstNode for ControlBlock {
    fn node_type(&self) -> &'static str {
        "ControlBlock"
    }
    fn display_label(&self) -> String {
        self.name.clone()
    }
    fn range(&self) -> &Range {
        &self.location
    }
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_control_block(self);
        for attribute in &self.attributes {
            attribute.accept(visitor);
        }
    }
    fn child_nodes(&self) -> Vec<&dyn AstNode> {
        self.args
            .iter()
            .flatten()
            .map(|e| e as &dyn AstNode)
            .chain(self.attributes.iter().map(|a| a as &dyn AstNode))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_window() -> WindowDefinition {
        WindowDefinition {
            name: "Win".to_string(),
            kind: WindowKind::Window,
            title: Some("Title".to_string()),
            attributes: Vec::new(),
            body: Vec::new(),
            location: Range::default(),
        }
    }

    #[test]
    fn test_window_display_label() {
        assert_eq!(empty_window().display_label(), "Win ('Title')");
    }

    #[test]
    fn test_menu_nesting_visitation() {
        let menubar = MenubarBlock {
            attributes: Vec::new(),
            entries: vec![MenuEntry::Menu(MenuBlock {
                text: Some("&File".to_string()),
                attributes: Vec::new(),
                entries: vec![
                    MenuEntry::Item(ItemDefinition {
                        text: Some("E&xit".to_string()),
                        attributes: Vec::new(),
                        location: Range::default(),
                    }),
                    MenuEntry::Separator(Separator {
                        location: Range::default(),
                    }),
                ],
                location: Range::default(),
            })],
            location: Range::default(),
        };

        struct Count {
            menus: usize,
            items: usize,
            separators: usize,
        }
        impl Visitor for Count {
            fn visit_menu_block(&mut self, _: &MenuBlock) {
                self.menus += 1;
            }
            fn visit_item_definition(&mut self, _: &ItemDefinition) {
                self.items += 1;
            }
            fn visit_separator(&mut self, _: &Separator) {
                self.separators += 1;
            }
        }

        let mut count = Count {
            menus: 0,
            items: 0,
            separators: 0,
        };
        menubar.accept(&mut count);
        assert_eq!((count.menus, count.items, count.separators), (1, 1, 1));
    }

    #[test]
    fn test_unknown_content_inside_sheet() {
        let sheet = SheetBlock {
            attributes: Vec::new(),
            tabs: vec![SheetEntry::Unknown(UnknownContent::new(
                "VENDORCLAUSE(1)",
                Range::default(),
            ))],
            location: Range::default(),
        };
        assert_eq!(sheet.child_nodes().len(), 1);
        assert_eq!(sheet.child_nodes()[0].node_type(), "UnknownContent");
    }
}
