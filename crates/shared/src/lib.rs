use serde::{Deserialize, Serialize};

/// Уникальный идентификатор элемента (монотонно возрастает при создании)
pub type ElementId = u64;

/// Тип элемента, для которого действуют ограничения поворота
pub const DOOR_TYPE: &str = "door";

fn default_scale() -> f64 {
    1.0
}

// ============================================================================
// Контейнер
// ============================================================================

/// Контейнер: внешний объём, внутри которого расставляются элементы.
///
/// Центр по X/Z в начале координат, пол на Y=0, потолок на Y=height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Описательный тег, на геометрию не влияет
    pub material: String,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            length: 6.0,
            width: 2.5,
            height: 3.0,
            material: "metal".to_string(),
        }
    }
}

impl Container {
    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }
}

/// Частичное изменение размеров контейнера (None = не менять)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

// ============================================================================
// Элементы
// ============================================================================

/// Размещённый элемент обстановки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Тип элемента (door, bed, fan, ...), определяет зону размещения
    #[serde(rename = "type")]
    pub kind: String,
    /// Центр элемента в координатах контейнера
    pub position: [f64; 3],
    /// Габариты без учёта масштаба (ширина, высота, глубина)
    pub size: [f64; 3],
    /// Углы Эйлера в радианах
    #[serde(default)]
    pub rotation: [f64; 3],
    /// Равномерный множитель габаритов
    #[serde(default = "default_scale")]
    pub scale: f64,
    pub material: String,
    pub color: String,
    /// Имеет смысл только для дверей
    #[serde(default)]
    pub is_open: bool,
    /// Идёт перетаскивание; в снимки не сериализуется
    #[serde(default, skip_serializing)]
    pub dragging: bool,
}

impl Element {
    /// Габариты с учётом масштаба
    pub fn scaled_size(&self) -> [f64; 3] {
        [
            self.size[0] * self.scale,
            self.size[1] * self.scale,
            self.size[2] * self.scale,
        ]
    }

    pub fn is_door(&self) -> bool {
        self.kind == DOOR_TYPE
    }
}

/// Частичное обновление элемента (merge-patch)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragging: Option<bool>,
}

impl ElementPatch {
    /// Меняет ли патч габариты или положение (требует проверки размещения)
    pub fn touches_placement(&self) -> bool {
        self.position.is_some() || self.size.is_some() || self.scale.is_some()
    }

    /// Меняет ли патч что-либо кроме флага перетаскивания
    pub fn is_tracked(&self) -> bool {
        self.touches_placement()
            || self.rotation.is_some()
            || self.material.is_some()
            || self.color.is_some()
            || self.is_open.is_some()
    }

    /// Применить патч к элементу
    pub fn apply(&self, element: &mut Element) {
        if let Some(position) = self.position {
            element.position = position;
        }
        if let Some(size) = self.size {
            element.size = size;
        }
        if let Some(rotation) = self.rotation {
            element.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            element.scale = scale;
        }
        if let Some(material) = &self.material {
            element.material = material.clone();
        }
        if let Some(color) = &self.color {
            element.color = color.clone();
        }
        if let Some(is_open) = self.is_open {
            element.is_open = is_open;
        }
        if let Some(dragging) = self.dragging {
            element.dragging = dragging;
        }
    }
}

// ============================================================================
// Снимки сцены
// ============================================================================

/// Снимок раскладки, единица истории undo/redo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutScene {
    pub container: Container,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub selected_element: Option<ElementId>,
}

impl LayoutScene {
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }
}

/// Формат экспорта: контейнер и элементы, без выделения и истории
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignExport {
    pub container: Container,
    pub elements: Vec<Element>,
}

impl From<&LayoutScene> for DesignExport {
    fn from(scene: &LayoutScene) -> Self {
        Self {
            container: scene.container.clone(),
            elements: scene.elements.clone(),
        }
    }
}

/// Формат сохранения прогресса: экспорт + выделение + настройки привязки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub container: Container,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub selected_element: Option<ElementId>,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub snap_to_rotation: bool,
    pub rotation_snap_angle: f64,
}

// ============================================================================
// Направляющие выравнивания
// ============================================================================

/// Ось направляющей
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    X,
    Y,
    Z,
}

impl GuideAxis {
    pub const ALL: [GuideAxis; 3] = [GuideAxis::X, GuideAxis::Y, GuideAxis::Z];

    /// Индекс компоненты вектора
    pub fn index(self) -> usize {
        match self {
            GuideAxis::X => 0,
            GuideAxis::Y => 1,
            GuideAxis::Z => 2,
        }
    }
}

/// Источник направляющей
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    Wall,
    Floor,
    Element,
}

/// Направляющая выравнивания (только визуальная подсказка)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: GuideAxis,
    pub value: f64,
    pub kind: GuideKind,
}
