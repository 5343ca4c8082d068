//! Localized strings for the credential-entry view.
//!
//! `tr`, `vi`, `ar` and `my` are selectable but have no translation; they
//! render the English texts.

use keygate_core::Locale;

#[derive(Debug, Clone, Copy)]
pub struct LoginTexts {
    pub title: &'static str,
    pub prompt: &'static str,
    pub key_label: &'static str,
    pub login_button: &'static str,
    pub language_label: &'static str,
    pub empty_key: &'static str,
}

const EN: LoginTexts = LoginTexts {
    title: "Admin Login",
    prompt: "Enter the admin API key to continue",
    key_label: "API key",
    login_button: "Login",
    language_label: "Language",
    empty_key: "Please enter an API key",
};

const ZH: LoginTexts = LoginTexts {
    title: "管理员登录",
    prompt: "请输入管理 API 密钥以继续",
    key_label: "API 密钥",
    login_button: "登录",
    language_label: "语言",
    empty_key: "请输入 API 密钥",
};

const ZH_TW: LoginTexts = LoginTexts {
    title: "管理員登入",
    prompt: "請輸入管理 API 金鑰以繼續",
    key_label: "API 金鑰",
    login_button: "登入",
    language_label: "語言",
    empty_key: "請輸入 API 金鑰",
};

const JA: LoginTexts = LoginTexts {
    title: "管理者ログイン",
    prompt: "続行するには管理 API キーを入力してください",
    key_label: "API キー",
    login_button: "ログイン",
    language_label: "言語",
    empty_key: "API キーを入力してください",
};

const KO: LoginTexts = LoginTexts {
    title: "관리자 로그인",
    prompt: "계속하려면 관리자 API 키를 입력하세요",
    key_label: "API 키",
    login_button: "로그인",
    language_label: "언어",
    empty_key: "API 키를 입력하세요",
};

const ES: LoginTexts = LoginTexts {
    title: "Acceso de administrador",
    prompt: "Introduce la clave API de administrador",
    key_label: "Clave API",
    login_button: "Entrar",
    language_label: "Idioma",
    empty_key: "Introduce una clave API",
};

const PT: LoginTexts = LoginTexts {
    title: "Login de administrador",
    prompt: "Digite a chave de API de administrador",
    key_label: "Chave de API",
    login_button: "Entrar",
    language_label: "Idioma",
    empty_key: "Digite uma chave de API",
};

const RU: LoginTexts = LoginTexts {
    title: "Вход администратора",
    prompt: "Введите API-ключ администратора",
    key_label: "API-ключ",
    login_button: "Войти",
    language_label: "Язык",
    empty_key: "Введите API-ключ",
};

pub fn login_texts(locale: Locale) -> LoginTexts {
    match locale {
        Locale::Zh => ZH,
        Locale::ZhTw => ZH_TW,
        Locale::Ja => JA,
        Locale::Ko => KO,
        Locale::Es => ES,
        Locale::Pt => PT,
        Locale::Ru => RU,
        Locale::En | Locale::Tr | Locale::Vi | Locale::Ar | Locale::My => EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_locale_has_texts() {
        for locale in Locale::ALL {
            let texts = login_texts(locale);
            assert!(!texts.title.is_empty());
            assert!(!texts.empty_key.is_empty());
        }
    }

    #[test]
    fn test_untranslated_falls_back_to_english() {
        assert_eq!(login_texts(Locale::Ar).login_button, "Login");
        assert_eq!(login_texts(Locale::Ja).login_button, "ログイン");
    }
}
