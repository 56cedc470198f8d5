use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(1); // 1=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        0 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.app" => if ru { "Приложение" } else { "App" },
        "menu.save_settings" => if ru { "Сохранить настройки" } else { "Save settings" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.demo" => if ru { "Демо" } else { "Demo" },
        "menu.aim" => if ru { "Тренажёр прицеливания  1" } else { "Aim trainer  1" },
        "menu.particles" => if ru { "Частицы  2" } else { "Particles  2" },
        "menu.scroll" => if ru { "Прокрутка секций  3" } else { "Scroll sections  3" },
        "menu.haunted" => if ru { "Дом с привидениями  4" } else { "Haunted house  4" },
        "menu.reset_session" => if ru { "Начать заново  R" } else { "Restart session  R" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.debug_panel" => if ru { "Панель отладки  H" } else { "Debug panel  H" },
        "menu.status_bar" => if ru { "Строка состояния" } else { "Status bar" },
        "menu.fullscreen" => if ru { "Полный экран  F11" } else { "Fullscreen  F11" },
        "menu.reset_camera" => if ru { "Сбросить камеру" } else { "Reset camera" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        // ── Debug panel ─────────────────────────────────────
        "dbg.trainer" => if ru { "Тренажёр" } else { "Trainer" },
        "dbg.trials" => if ru { "Попыток за сессию" } else { "Trials per session" },
        "dbg.spawn_radius" => if ru { "Радиус появления" } else { "Spawn radius" },
        "dbg.scale_min" => if ru { "Мин. масштаб" } else { "Min scale" },
        "dbg.scale_max" => if ru { "Макс. масштаб" } else { "Max scale" },
        "dbg.target_radius" => if ru { "Радиус цели" } else { "Target radius" },
        "dbg.segments" => if ru { "Сегменты" } else { "Segments" },
        "dbg.label_size" => if ru { "Размер метки" } else { "Label size" },
        "dbg.idle_color" => if ru { "Цвет цели" } else { "Target color" },
        "dbg.hover_color" => if ru { "Цвет при наведении" } else { "Hover color" },

        "dbg.particles" => if ru { "Частицы" } else { "Particles" },
        "dbg.count" => if ru { "Количество" } else { "Count" },
        "dbg.size" => if ru { "Размер" } else { "Size" },
        "dbg.theme" => if ru { "Текстура" } else { "Texture" },

        "dbg.scroll" => if ru { "Прокрутка" } else { "Scroll" },
        "dbg.section_distance" => if ru { "Шаг секций" } else { "Section distance" },
        "dbg.parallax" => if ru { "Параллакс" } else { "Parallax" },
        "dbg.parallax_ease" => if ru { "Сглаживание параллакса" } else { "Parallax easing" },
        "dbg.spin_seconds" => if ru { "Длительность вращения" } else { "Spin duration" },
        "dbg.stars" => if ru { "Звёзды" } else { "Stars" },
        "dbg.star_size" => if ru { "Размер звёзд" } else { "Star size" },
        "dbg.material_color" => if ru { "Цвет материала" } else { "Material color" },

        "dbg.haunted" => if ru { "Дом с привидениями" } else { "Haunted house" },
        "dbg.graves" => if ru { "Надгробия" } else { "Graves" },
        "dbg.grave_radius_min" => if ru { "Мин. радиус надгробий" } else { "Min grave radius" },
        "dbg.grave_radius_max" => if ru { "Макс. радиус надгробий" } else { "Max grave radius" },
        "dbg.ghost_speed" => if ru { "Скорость призраков" } else { "Ghost speed" },
        "dbg.fog_near" => if ru { "Начало тумана" } else { "Fog start" },
        "dbg.fog_far" => if ru { "Конец тумана" } else { "Fog end" },
        "dbg.fog_color" => if ru { "Цвет тумана" } else { "Fog color" },

        "dbg.viewport" => if ru { "Вьюпорт" } else { "Viewport" },
        "dbg.bg_color" => if ru { "Цвет фона" } else { "Background color" },
        "dbg.font_size" => if ru { "Размер шрифта" } else { "Font size" },
        "dbg.defaults" => if ru { "По умолчанию" } else { "Defaults" },

        // ── Status bar ──────────────────────────────────────
        "status.trial" => if ru { "Попытка" } else { "Trial" },
        "status.best" => if ru { "Лучший" } else { "Best" },
        "status.last" => if ru { "Результат" } else { "Result" },
        "status.cycles" => if ru { "Сессий" } else { "Sessions" },
        "status.on_target" => if ru { "на цели" } else { "on target" },
        "status.particles" => if ru { "Частиц" } else { "Particles" },
        "status.section" => if ru { "Секция" } else { "Section" },
        "status.spinning" => if ru { "вращение" } else { "spinning" },
        "status.graves" => if ru { "Надгробий" } else { "Graves" },
        "status.time" => if ru { "Время" } else { "Time" },
        "status.error" => if ru { "Ошибка" } else { "Error" },

        // ── Hints ───────────────────────────────────────────
        "hint.aim" => if ru {
            "Щелкните по цели, чтобы начать  •  Двойной щелчок: полный экран"
        } else {
            "Click the target to start  •  Double click: fullscreen"
        },
        "hint.particles" => if ru {
            "ЛКМ: вращение  •  Колесо: масштаб  •  Двойной щелчок: полный экран"
        } else {
            "LMB: orbit  •  Scroll: zoom  •  Double click: fullscreen"
        },

        "hint.scroll" => if ru {
            "Колесо: прокрутка секций  •  Мышь: параллакс  •  Двойной щелчок: полный экран"
        } else {
            "Scroll: move between sections  •  Mouse: parallax  •  Double click: fullscreen"
        },
        "hint.haunted" => if ru {
            "ЛКМ: вращение  •  Колесо: масштаб  •  Двойной щелчок: полный экран"
        } else {
            "LMB: orbit  •  Scroll: zoom  •  Double click: fullscreen"
        },

        // ── Viewport ────────────────────────────────────────
        "viewport.section" => if ru { "Секция" } else { "Section" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_translated() {
        for key in [
            "menu.demo",
            "menu.scroll",
            "menu.haunted",
            "dbg.trials",
            "dbg.fog_color",
            "status.trial",
            "status.section",
            "hint.aim",
            "hint.scroll",
            "hint.haunted",
            "viewport.section",
        ] {
            assert_ne!(t(key), "???", "missing translation for {key}");
        }
        assert_eq!(t("no.such.key"), "???");
    }
}
