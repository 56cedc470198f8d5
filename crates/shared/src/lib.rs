use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибка проверки конфигурации на границе (до использования значений)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Значение должно быть строго положительным и конечным
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    /// Нижняя граница диапазона больше верхней
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange { field: &'static str, min: f64, max: f64 },
    /// Значение вне допустимого диапазона
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Цвет не в формате #rrggbb
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    /// Размер вьюпорта (окно свёрнуто или ещё не размечено)
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // `!(value > 0.0)` также отсекает NaN
    if !(value > 0.0) || !value.is_finite() {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Допустимые пределы соотношения сторон вьюпорта
pub const MIN_ASPECT: f32 = 1.0 / 64.0;
pub const MAX_ASPECT: f32 = 64.0;

/// Проверить размер вьюпорта и вернуть соотношение сторон
pub fn viewport_aspect(width: f32, height: f32) -> Result<f32, ConfigError> {
    if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
        return Err(ConfigError::InvalidViewport { width, height });
    }
    let aspect = width / height;
    if !(MIN_ASPECT..=MAX_ASPECT).contains(&aspect) {
        return Err(ConfigError::InvalidViewport { width, height });
    }
    Ok(aspect)
}

// ── Цвет ────────────────────────────────────────────────────

/// RGB-цвет, сериализуется как "#rrggbb"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Разобрать строку вида "#ff6030"
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ConfigError::InvalidColor(s.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ConfigError::InvalidColor(s.to_string()))
        };
        Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    /// Компоненты в диапазоне 0.0 - 1.0 (для шейдеров)
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.0[0] as f32 / 255.0,
            self.0[1] as f32 / 255.0,
            self.0[2] as f32 / 255.0,
        ]
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

// ── Камера ──────────────────────────────────────────────────

/// Параметры перспективной камеры
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Вертикальный угол обзора (градусы)
    pub fov_degrees: f32,
    /// Ближняя плоскость отсечения
    pub near: f32,
    /// Дальняя плоскость отсечения
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        within("fov_degrees", self.fov_degrees as f64, 1.0, 179.0)?;
        positive("near", self.near as f64)?;
        positive("far", self.far as f64)?;
        if self.near >= self.far {
            return Err(ConfigError::InvertedRange {
                field: "near/far",
                min: self.near as f64,
                max: self.far as f64,
            });
        }
        Ok(())
    }
}

// ── Тренажёр прицеливания ───────────────────────────────────

/// Параметры тренажёра прицеливания
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Количество попаданий в одной серии
    pub trials_per_session: u32,
    /// Радиус области появления цели на единицу соотношения сторон
    pub spawn_radius_per_aspect: f32,
    /// Минимальный масштаб цели
    pub scale_min: f32,
    /// Максимальный масштаб цели
    pub scale_max: f32,
    /// Радиус диска цели (в масштабе 1)
    pub target_radius: f32,
    /// Количество сегментов диска
    pub target_segments: u32,
    /// Высота текста на цели (в масштабе 1)
    pub label_size: f32,
    /// Цвет цели до первого кадра
    pub initial_color: Rgb,
    /// Цвет цели без наведения
    pub idle_color: Rgb,
    /// Цвет цели под курсором
    pub hover_color: Rgb,
    /// Цвет текста
    pub label_color: Rgb,
    /// Параметры камеры
    pub camera: CameraConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            trials_per_session: 10,
            spawn_radius_per_aspect: 4.0,
            scale_min: 0.5,
            scale_max: 1.5,
            target_radius: 1.0,
            target_segments: 32,
            label_size: 0.3,
            initial_color: Rgb([0xff, 0x60, 0x30]),
            idle_color: Rgb([0x05, 0x64, 0x05]),
            hover_color: Rgb([0x86, 0x0a, 0x0a]),
            label_color: Rgb::WHITE,
            camera: CameraConfig::default(),
        }
    }
}

impl TrainerConfig {
    pub const MAX_TRIALS: u32 = 1000;
    /// Пределы радиуса появления (на единицу соотношения сторон)
    pub const SPAWN_RADIUS_MIN: f32 = 0.01;
    pub const SPAWN_RADIUS_MAX: f32 = 100.0;
    /// Верхний предел масштаба цели
    pub const SCALE_LIMIT: f32 = 100.0;

    pub fn validate(&self) -> Result<(), ConfigError> {
        within(
            "trials_per_session",
            self.trials_per_session as f64,
            1.0,
            Self::MAX_TRIALS as f64,
        )?;
        positive("spawn_radius_per_aspect", self.spawn_radius_per_aspect as f64)?;
        within(
            "spawn_radius_per_aspect",
            self.spawn_radius_per_aspect as f64,
            Self::SPAWN_RADIUS_MIN as f64,
            Self::SPAWN_RADIUS_MAX as f64,
        )?;
        positive("scale_min", self.scale_min as f64)?;
        positive("scale_max", self.scale_max as f64)?;
        within("scale_max", self.scale_max as f64, 0.0, Self::SCALE_LIMIT as f64)?;
        if self.scale_min > self.scale_max {
            return Err(ConfigError::InvertedRange {
                field: "scale",
                min: self.scale_min as f64,
                max: self.scale_max as f64,
            });
        }
        positive("target_radius", self.target_radius as f64)?;
        within("target_segments", self.target_segments as f64, 3.0, 256.0)?;
        positive("label_size", self.label_size as f64)?;
        self.camera.validate()
    }
}

// ── Частицы ─────────────────────────────────────────────────

/// Параметры облака частиц
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Количество частиц
    pub count: u32,
    /// Размер частицы (мировые единицы)
    pub size: f32,
    /// Размер куба, в котором размещаются частицы
    pub spread: f32,
    /// Номер текстуры частицы (1..=13)
    pub theme: u8,
    /// Параметры камеры
    pub camera: CameraConfig,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            size: 0.1,
            spread: 10.0,
            theme: 1,
            camera: CameraConfig::default(),
        }
    }
}

impl ParticleConfig {
    pub const COUNT_MIN: u32 = 100;
    pub const COUNT_MAX: u32 = 100_000;
    pub const COUNT_STEP: u32 = 1000;
    pub const SIZE_MIN: f32 = 0.001;
    pub const SIZE_MAX: f32 = 0.3;
    pub const THEME_COUNT: u8 = 13;
    pub const SPREAD_MAX: f32 = 1000.0;

    pub fn validate(&self) -> Result<(), ConfigError> {
        within(
            "count",
            self.count as f64,
            Self::COUNT_MIN as f64,
            Self::COUNT_MAX as f64,
        )?;
        positive("size", self.size as f64)?;
        within(
            "size",
            self.size as f64,
            Self::SIZE_MIN as f64,
            Self::SIZE_MAX as f64,
        )?;
        positive("spread", self.spread as f64)?;
        within("spread", self.spread as f64, 0.0, Self::SPREAD_MAX as f64)?;
        within("theme", self.theme as f64, 1.0, Self::THEME_COUNT as f64)?;
        self.camera.validate()
    }
}

// ── Прокрутка по секциям ────────────────────────────────────

/// Параметры демо с прокруткой по секциям
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Расстояние по Y между фигурами соседних секций
    pub section_distance: f32,
    /// Амплитуда параллакса от положения курсора
    pub parallax_amount: f32,
    /// Скорость сглаживания параллакса (1/с)
    pub parallax_ease: f32,
    /// Длительность вращения при смене секции (с)
    pub spin_seconds: f32,
    /// Количество звёзд
    pub star_count: u32,
    /// Размер звезды (мировые единицы)
    pub star_size: f32,
    /// Цвет материала фигур
    pub material_color: Rgb,
    /// Параметры камеры
    pub camera: CameraConfig,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            section_distance: 4.0,
            parallax_amount: 0.5,
            parallax_ease: 5.0,
            spin_seconds: 1.5,
            star_count: 200,
            star_size: 0.03,
            material_color: Rgb([0xfe, 0xfe, 0xfe]),
            camera: CameraConfig {
                fov_degrees: 35.0,
                ..CameraConfig::default()
            },
        }
    }
}

impl ScrollConfig {
    pub const STAR_MAX: u32 = 5000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        within("section_distance", self.section_distance as f64, 0.5, 50.0)?;
        within("parallax_amount", self.parallax_amount as f64, 0.0, 2.0)?;
        within("parallax_ease", self.parallax_ease as f64, 0.1, 60.0)?;
        within("spin_seconds", self.spin_seconds as f64, 0.1, 10.0)?;
        within("star_count", self.star_count as f64, 0.0, Self::STAR_MAX as f64)?;
        within(
            "star_size",
            self.star_size as f64,
            ParticleConfig::SIZE_MIN as f64,
            ParticleConfig::SIZE_MAX as f64,
        )?;
        self.camera.validate()
    }
}

// ── Дом с привидениями ──────────────────────────────────────

/// Параметры сцены с домом и призраками
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HauntedConfig {
    /// Количество надгробий
    pub grave_count: u32,
    /// Ближайшее к дому расстояние надгробий
    pub grave_radius_min: f32,
    /// Дальнее расстояние надгробий
    pub grave_radius_max: f32,
    /// Множитель скорости призраков
    pub ghost_speed: f32,
    /// Цвет тумана и фона
    pub fog_color: Rgb,
    /// Начало тумана
    pub fog_near: f32,
    /// Полный туман
    pub fog_far: f32,
    /// Параметры камеры
    pub camera: CameraConfig,
}

impl Default for HauntedConfig {
    fn default() -> Self {
        Self {
            grave_count: 50,
            grave_radius_min: 3.0,
            grave_radius_max: 9.0,
            ghost_speed: 1.0,
            fog_color: Rgb([0x26, 0x28, 0x37]),
            fog_near: 1.0,
            fog_far: 15.0,
            camera: CameraConfig::default(),
        }
    }
}

impl HauntedConfig {
    pub const GRAVE_MAX: u32 = 500;
    pub const RADIUS_LIMIT: f32 = 50.0;

    pub fn validate(&self) -> Result<(), ConfigError> {
        within("grave_count", self.grave_count as f64, 0.0, Self::GRAVE_MAX as f64)?;
        positive("grave_radius_min", self.grave_radius_min as f64)?;
        within(
            "grave_radius_max",
            self.grave_radius_max as f64,
            0.0,
            Self::RADIUS_LIMIT as f64,
        )?;
        if self.grave_radius_min > self.grave_radius_max {
            return Err(ConfigError::InvertedRange {
                field: "grave_radius",
                min: self.grave_radius_min as f64,
                max: self.grave_radius_max as f64,
            });
        }
        within("ghost_speed", self.ghost_speed as f64, 0.0, 10.0)?;
        within("fog_near", self.fog_near as f64, 0.0, 1000.0)?;
        within("fog_far", self.fog_far as f64, 0.0, 1000.0)?;
        if self.fog_near >= self.fog_far {
            return Err(ConfigError::InvertedRange {
                field: "fog",
                min: self.fog_near as f64,
                max: self.fog_far as f64,
            });
        }
        self.camera.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Rgb ---

    #[test]
    fn test_rgb_hex_parse() {
        assert_eq!(Rgb::from_hex("#ff6030").unwrap(), Rgb([255, 96, 48]));
        assert_eq!(Rgb::from_hex("#056405").unwrap().to_hex(), "#056405");
        assert!(matches!(Rgb::from_hex("ff6030"), Err(ConfigError::InvalidColor(_))));
        assert!(matches!(Rgb::from_hex("#ff60"), Err(ConfigError::InvalidColor(_))));
        assert!(matches!(Rgb::from_hex("#gg6030"), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn test_rgb_serde_as_string() {
        let json = serde_json::to_string(&Rgb([0x86, 0x0a, 0x0a])).unwrap();
        assert_eq!(json, r##""#860a0a""##);
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb([0x86, 0x0a, 0x0a]));
        assert!(serde_json::from_str::<Rgb>(r#""red""#).is_err());
    }

    // --- TrainerConfig ---

    #[test]
    fn test_trainer_defaults_are_valid() {
        let config = TrainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trials_per_session, 10);
    }

    #[test]
    fn test_trainer_rejects_negative_sizes() {
        let config = TrainerConfig {
            target_radius: -1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "target_radius",
                value: -1.0
            })
        );

        let config = TrainerConfig {
            spawn_radius_per_aspect: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "spawn_radius_per_aspect", .. })
        ));
    }

    #[test]
    fn test_trainer_rejects_huge_spawn_radius() {
        let config = TrainerConfig {
            spawn_radius_per_aspect: 1e38,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "spawn_radius_per_aspect", .. })
        ));

        let config = TrainerConfig {
            spawn_radius_per_aspect: TrainerConfig::SPAWN_RADIUS_MAX,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = TrainerConfig {
            scale_max: 1e30,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "scale_max", .. })
        ));
    }

    #[test]
    fn test_trainer_rejects_inverted_scale() {
        let config = TrainerConfig {
            scale_min: 2.0,
            scale_max: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { field: "scale", .. })
        ));
    }

    #[test]
    fn test_trainer_rejects_zero_trials() {
        let config = TrainerConfig {
            trials_per_session: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "trials_per_session", .. })
        ));
    }

    #[test]
    fn test_trainer_partial_json_uses_defaults() {
        let config: TrainerConfig =
            serde_json::from_str(r#"{"trials_per_session": 5}"#).unwrap();
        assert_eq!(config.trials_per_session, 5);
        assert_eq!(config.scale_max, 1.5);
        assert_eq!(config.camera, CameraConfig::default());
    }

    // --- CameraConfig ---

    #[test]
    fn test_camera_near_far() {
        let camera = CameraConfig {
            near: 10.0,
            far: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            camera.validate(),
            Err(ConfigError::InvertedRange { field: "near/far", .. })
        ));
    }

    // --- ParticleConfig ---

    #[test]
    fn test_particle_bounds() {
        assert!(ParticleConfig::default().validate().is_ok());

        let too_many = ParticleConfig {
            count: 200_000,
            ..Default::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::OutOfRange { field: "count", .. })
        ));

        let bad_size = ParticleConfig {
            size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_size.validate(),
            Err(ConfigError::NonPositive { field: "size", .. })
        ));

        let bad_theme = ParticleConfig {
            theme: 14,
            ..Default::default()
        };
        assert!(matches!(
            bad_theme.validate(),
            Err(ConfigError::OutOfRange { field: "theme", .. })
        ));
    }

    // --- ScrollConfig ---

    #[test]
    fn test_scroll_defaults() {
        let config = ScrollConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.fov_degrees, 35.0);
        assert_eq!(config.star_count, 200);
    }

    #[test]
    fn test_scroll_bounds() {
        let config = ScrollConfig {
            star_count: 10_000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "star_count", .. })
        ));

        let config = ScrollConfig {
            parallax_ease: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "parallax_ease", .. })
        ));
    }

    // --- HauntedConfig ---

    #[test]
    fn test_haunted_bounds() {
        assert!(HauntedConfig::default().validate().is_ok());

        let inverted = HauntedConfig {
            grave_radius_min: 8.0,
            grave_radius_max: 4.0,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvertedRange { field: "grave_radius", .. })
        ));

        let fog = HauntedConfig {
            fog_near: 20.0,
            ..Default::default()
        };
        assert!(matches!(
            fog.validate(),
            Err(ConfigError::InvertedRange { field: "fog", .. })
        ));

        let json = r##"{"grave_count": 10, "fog_color": "#000000"}"##;
        let partial: HauntedConfig = serde_json::from_str(json).unwrap();
        assert_eq!(partial.grave_count, 10);
        assert_eq!(partial.fog_color, Rgb([0, 0, 0]));
        assert_eq!(partial.grave_radius_max, 9.0);
    }

    // --- Viewport ---

    #[test]
    fn test_viewport_aspect() {
        assert_eq!(viewport_aspect(800.0, 400.0), Ok(2.0));
        assert!(viewport_aspect(800.0, 0.0).is_err());
        assert!(viewport_aspect(-1.0, 10.0).is_err());
        assert!(viewport_aspect(f32::INFINITY, 10.0).is_err());
        assert!(viewport_aspect(f32::MAX, 1e-30).is_err());
        assert_eq!(viewport_aspect(6400.0, 100.0), Ok(MAX_ASPECT));
    }
}
