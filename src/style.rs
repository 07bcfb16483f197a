use iced::{container, Background, Color};

pub struct Container(pub Color);

impl container::StyleSheet for Container {
    fn style(&self) -> container::Style {
        container::Style {
            background: Some(Background::Color(self.0)),
            ..container::Style::default()
        }
    }
}
