//! Window sub-grammar rules
//!
//! Shared verbatim between the two entry points: the declarations-only
//! grammar reaches windows as top-level declarations, the full program
//! grammar reaches them inside local data sections. Both call into this
//! module, so the disambiguation logic exists exactly once.
//!
//! Every block rule here follows the same shape:
//!
//!     open-keyword [ '(' arguments ')' ] [ attribute-list ]
//!     separator* element* end-marker
//!
//! where the element loop runs while the next token starts a recognized
//! element, and anything else inside the block is attached as an opaque
//! unknown-content node rather than failing the block.

use log::trace;

use super::attributes::first_string;
use super::Parser;
use crate::clarion::ast::elements::{
    ButtonDefinition, ControlBlock, ItemDefinition, MenuBlock, MenuEntry, MenubarBlock,
    OptionBlock, Separator, SheetBlock, SheetEntry, TabBlock, ToolbarBlock, ToolbarEntry,
    UiElement, WindowDefinition, WindowKind,
};
use crate::clarion::ast::range::Range;
use crate::clarion::token::{Keyword, TokenKind};

impl Parser<'_> {
    /// `Name (WINDOW|APPLICATION) ['(title)'] attrs body END`
    pub(crate) fn parse_window_definition(&mut self) -> WindowDefinition {
        let label = self.cursor.bump();
        let open = label.range.clone();
        let kind_token = self.cursor.bump();
        let kind = if kind_token.is_keyword(Keyword::Application) {
            WindowKind::Application
        } else {
            WindowKind::Window
        };
        trace!("parse window: {}", label.text);

        let header_args = self.parse_header_args();
        let title = first_string(&header_args);
        let attributes = self.parse_ui_attributes();
        let body = self.parse_ui_body();
        self.expect_end(kind_token.text.to_ascii_uppercase().as_str());

        WindowDefinition {
            name: label.text,
            kind,
            title,
            attributes,
            body,
            location: self.close_span(&open),
        }
    }

    /// Body elements of a window, tab, or option block, until END.
    fn parse_ui_body(&mut self) -> Vec<UiElement> {
        let mut body = Vec::new();

        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            match self.cursor.kind() {
                TokenKind::Keyword(Keyword::Menubar) => {
                    body.push(UiElement::Menubar(self.parse_menubar_block()));
                }
                TokenKind::Keyword(Keyword::Toolbar) => {
                    body.push(UiElement::Toolbar(self.parse_toolbar_block()));
                }
                TokenKind::Keyword(Keyword::Sheet) => {
                    body.push(UiElement::Sheet(self.parse_sheet_block()));
                }
                TokenKind::Keyword(Keyword::Option) => {
                    body.push(UiElement::Option(self.parse_option_block()));
                }
                TokenKind::Keyword(Keyword::Button) => {
                    body.push(UiElement::Button(self.parse_button_definition()));
                }
                TokenKind::Identifier => {
                    body.push(UiElement::Control(self.parse_control_block()));
                }
                _ => {
                    let unknown = self.unknown_in_block();
                    self.warn_unknown_content(&unknown, "window body");
                    body.push(UiElement::Unknown(unknown));
                }
            }
        }

        body
    }

    /// `MENUBAR attrs (menu | item | separator)* END`
    fn parse_menubar_block(&mut self) -> MenubarBlock {
        let open = self.cursor.bump().range; // MENUBAR
        let attributes = self.parse_ui_attributes();
        let entries = self.parse_menu_entries();
        self.expect_end("MENUBAR");

        MenubarBlock {
            attributes,
            entries,
            location: self.close_span(&open),
        }
    }

    /// Entries of a menubar or menu body; menus nest.
    fn parse_menu_entries(&mut self) -> Vec<MenuEntry> {
        let mut entries = Vec::new();

        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            match self.cursor.kind() {
                TokenKind::Keyword(Keyword::Menu) => {
                    entries.push(MenuEntry::Menu(self.parse_menu_block()));
                }
                TokenKind::Keyword(Keyword::Item) => {
                    entries.push(MenuEntry::Item(self.parse_item_definition()));
                }
                TokenKind::Keyword(Keyword::Separator) => {
                    let token = self.cursor.bump();
                    entries.push(MenuEntry::Separator(Separator {
                        location: token.range,
                    }));
                }
                _ => {
                    let unknown = self.unknown_in_block();
                    self.warn_unknown_content(&unknown, "menu body");
                    entries.push(MenuEntry::Unknown(unknown));
                }
            }
        }

        entries
    }

    /// `MENU['(text)'] attrs entries END`
    fn parse_menu_block(&mut self) -> MenuBlock {
        let open = self.cursor.bump().range; // MENU
        let header_args = self.parse_header_args();
        let text = first_string(&header_args);
        let attributes = self.parse_ui_attributes();
        let entries = self.parse_menu_entries();
        self.expect_end("MENU");

        MenuBlock {
            text,
            attributes,
            entries,
            location: self.close_span(&open),
        }
    }

    /// `ITEM['(text)'] (',' attr)*` — a leaf, ended by its line.
    fn parse_item_definition(&mut self) -> ItemDefinition {
        let open = self.cursor.bump().range; // ITEM
        let header_args = self.parse_header_args();
        let text = first_string(&header_args);
        let attributes = self.parse_comma_attributes();

        ItemDefinition {
            text,
            attributes,
            location: self.close_span(&open),
        }
    }

    /// `TOOLBAR attrs (button | control)* END`
    fn parse_toolbar_block(&mut self) -> ToolbarBlock {
        let open = self.cursor.bump().range; // TOOLBAR
        let attributes = self.parse_ui_attributes();

        let mut entries = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            match self.cursor.kind() {
                TokenKind::Keyword(Keyword::Button) => {
                    entries.push(ToolbarEntry::Button(self.parse_button_definition()));
                }
                TokenKind::Identifier => {
                    entries.push(ToolbarEntry::Control(self.parse_control_block()));
                }
                _ => {
                    let unknown = self.unknown_in_block();
                    self.warn_unknown_content(&unknown, "TOOLBAR body");
                    entries.push(ToolbarEntry::Unknown(unknown));
                }
            }
        }
        self.expect_end("TOOLBAR");

        ToolbarBlock {
            attributes,
            entries,
            location: self.close_span(&open),
        }
    }

    /// `BUTTON['(label)'] (',' attr)*` — a leaf, ended by its line.
    fn parse_button_definition(&mut self) -> ButtonDefinition {
        let open = self.cursor.bump().range; // BUTTON
        let header_args = self.parse_header_args();
        let label = first_string(&header_args);
        let attributes = self.parse_comma_attributes();

        ButtonDefinition {
            label,
            attributes,
            location: self.close_span(&open),
        }
    }

    /// `SHEET attrs tab* END`
    fn parse_sheet_block(&mut self) -> SheetBlock {
        let open = self.cursor.bump().range; // SHEET
        let attributes = self.parse_ui_attributes();

        let mut tabs = Vec::new();
        loop {
            self.cursor.skip_list_separators();
            if self.cursor.at_eof() || self.cursor.at_keyword(Keyword::End) {
                break;
            }

            if self.cursor.at_keyword(Keyword::Tab) {
                tabs.push(SheetEntry::Tab(self.parse_tab_block()));
            } else {
                let unknown = self.unknown_in_block();
                self.warn_unknown_content(&unknown, "SHEET body");
                tabs.push(SheetEntry::Unknown(unknown));
            }
        }
        self.expect_end("SHEET");

        SheetBlock {
            attributes,
            tabs,
            location: self.close_span(&open),
        }
    }

    /// `TAB['(text)'] attrs body END`
    fn parse_tab_block(&mut self) -> TabBlock {
        let open = self.cursor.bump().range; // TAB
        let header_args = self.parse_header_args();
        let text = first_string(&header_args);
        let attributes = self.parse_ui_attributes();
        let body = self.parse_ui_body();
        self.expect_end("TAB");

        TabBlock {
            text,
            attributes,
            body,
            location: self.close_span(&open),
        }
    }

    /// `OPTION['(text)'] attrs body END`
    fn parse_option_block(&mut self) -> OptionBlock {
        let open = self.cursor.bump().range; // OPTION
        let header_args = self.parse_header_args();
        let text = first_string(&header_args);
        let attributes = self.parse_ui_attributes();
        let body = self.parse_ui_body();
        self.expect_end("OPTION");

        OptionBlock {
            text,
            attributes,
            body,
            location: self.close_span(&open),
        }
    }

    /// A generic control: `NAME['(args)'] (',' attr)*`. Control types are
    /// deliberately not keywords, so vendor control sets parse unchanged.
    fn parse_control_block(&mut self) -> ControlBlock {
        let name_token = self.cursor.bump();
        let open: Range = name_token.range.clone();
        let args = self.parse_header_args();
        let attributes = self.parse_comma_attributes();

        ControlBlock {
            name: name_token.text,
            args,
            attributes,
            location: self.close_span(&open),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarion::ast::elements::Attribute;
    use crate::clarion::lexing::tokenize;

    fn parse_window(source: &str) -> (WindowDefinition, Vec<crate::clarion::ast::Diagnostic>) {
        let output = tokenize(source);
        let mut parser = Parser::new(&output.tokens, source);
        let window = parser.parse_window_definition();
        (window, parser.diagnostics)
    }

    #[test]
    fn test_window_with_button() {
        let source = "MyWin WINDOW('Title'),AT(0,0,100,50),CENTER\n  BUTTON('OK'),AT(10,10)\nEND";
        let (window, diagnostics) = parse_window(source);
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        assert_eq!(window.name, "MyWin");
        assert_eq!(window.kind, WindowKind::Window);
        assert_eq!(window.title.as_deref(), Some("Title"));
        assert_eq!(window.attributes.len(), 2);
        assert!(matches!(window.attributes[0], Attribute::At(_)));
        assert_eq!(window.attributes[1].name(), "CENTER");
        assert_eq!(window.body.len(), 1);
        let UiElement::Button(button) = &window.body[0] else {
            panic!("expected button");
        };
        assert_eq!(button.label.as_deref(), Some("OK"));
        assert_eq!(button.attributes.len(), 1);
    }

    #[test]
    fn test_window_span_covers_end() {
        let source = "W WINDOW('t')\nEND";
        let (window, diagnostics) = parse_window(source);
        assert!(diagnostics.is_empty());
        assert_eq!(window.location.span, 0..source.len());
    }

    #[test]
    fn test_application_kind() {
        let (window, _) = parse_window("App APPLICATION('Main')\nEND");
        assert_eq!(window.kind, WindowKind::Application);
    }

    #[test]
    fn test_menubar_menu_item_separator() {
        let source = "W WINDOW('t')\n\
                      MENUBAR\n\
                      MENU('&File'),USE(?FileMenu)\n\
                      ITEM('&Open'),USE(?Open)\n\
                      SEPARATOR\n\
                      ITEM('E&xit'),STD(4)\n\
                      END\n\
                      END\n\
                      END";
        let (window, diagnostics) = parse_window(source);
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        let UiElement::Menubar(menubar) = &window.body[0] else {
            panic!("expected menubar");
        };
        let MenuEntry::Menu(menu) = &menubar.entries[0] else {
            panic!("expected menu");
        };
        assert_eq!(menu.text.as_deref(), Some("&File"));
        assert_eq!(menu.entries.len(), 3);
        assert!(matches!(menu.entries[0], MenuEntry::Item(_)));
        assert!(matches!(menu.entries[1], MenuEntry::Separator(_)));
        assert!(matches!(menu.entries[2], MenuEntry::Item(_)));
    }

    #[test]
    fn test_sheet_tabs_with_controls() {
        let source = "W WINDOW('t')\n\
                      SHEET,AT(2,2,196,116)\n\
                      TAB('General'),USE(?Tab1)\n\
                      ENTRY(s20),AT(10,10),USE(LOC:Name)\n\
                      END\n\
                      TAB('Extra')\n\
                      OPTION('Mode'),AT(10,30)\n\
                      RADIO('A'),AT(12,32)\n\
                      END\n\
                      END\n\
                      END\n\
                      END";
        let (window, diagnostics) = parse_window(source);
        assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        let UiElement::Sheet(sheet) = &window.body[0] else {
            panic!("expected sheet");
        };
        assert_eq!(sheet.tabs.len(), 2);
        let SheetEntry::Tab(general) = &sheet.tabs[0] else {
            panic!("expected tab");
        };
        assert_eq!(general.text.as_deref(), Some("General"));
        let UiElement::Control(entry) = &general.body[0] else {
            panic!("expected control");
        };
        assert_eq!(entry.name, "ENTRY");
        assert_eq!(entry.attributes.len(), 2);
        let SheetEntry::Tab(extra) = &sheet.tabs[1] else {
            panic!("expected tab");
        };
        let UiElement::Option(option) = &extra.body[0] else {
            panic!("expected option block");
        };
        assert_eq!(option.text.as_deref(), Some("Mode"));
        assert!(matches!(option.body[0], UiElement::Control(_)));
    }

    #[test]
    fn test_unknown_content_does_not_abort_block() {
        let source = "W WINDOW('t')\n\
                      SHEET\n\
                      TAB('T')\n\
                      'stray literal' 42\n\
                      ENTRY(x)\n\
                      END\n\
                      END\n\
                      END";
        let (window, diagnostics) = parse_window(source);
        let UiElement::Sheet(sheet) = &window.body[0] else {
            panic!("expected sheet");
        };
        let SheetEntry::Tab(tab) = &sheet.tabs[0] else {
            panic!("expected tab");
        };
        assert!(tab.body.iter().any(|e| matches!(e, UiElement::Unknown(_))));
        assert!(tab.body.iter().any(|e| matches!(e, UiElement::Control(_))));
        assert!(diagnostics
            .iter()
            .any(|d| d.code.as_deref() == Some("unknown-content")));
    }

    #[test]
    fn test_attribute_separator_interchangeability() {
        let comma_form = "W WINDOW('t'),AT(1,2),MAX\nEND";
        let break_form = "W WINDOW('t')\nAT(1,2)\nMAX\nEND";
        let (with_commas, d1) = parse_window(comma_form);
        let (with_breaks, d2) = parse_window(break_form);
        assert!(d1.is_empty() && d2.is_empty());

        // Attribute lists are AST-equal up to source positions
        assert_eq!(with_commas.attributes.len(), with_breaks.attributes.len());
        for (a, b) in with_commas
            .attributes
            .iter()
            .zip(with_breaks.attributes.iter())
        {
            assert_eq!(a.name(), b.name());
            assert_eq!(std::mem::discriminant(a), std::mem::discriminant(b));
        }
    }

    #[test]
    fn test_missing_window_end_recovers() {
        let source = "W WINDOW('t')\nBUTTON('OK')\n";
        let (window, diagnostics) = parse_window(source);
        assert_eq!(window.body.len(), 1);
        assert!(diagnostics
            .iter()
            .any(|d| d.code.as_deref() == Some("missing-end")));
    }
}
