pub(crate) mod apps;
pub(crate) mod db;
pub(crate) mod editor;
pub(crate) mod exec;
pub(crate) mod firewall;
pub(crate) mod main_menu;
pub(crate) mod nginx;
pub(crate) mod php;
pub(crate) mod redis;
pub(crate) mod splash;
pub(crate) mod toolkit;
pub(crate) mod users;

use super::screen::View;

/// Every screen the stack can hold. The enum owns the state; `view`
/// erases it so the dispatcher works against one trait.
pub(crate) enum Screen {
    Splash(splash::Splash),
    MainMenu(main_menu::MainMenu),
    ConfigMenu(main_menu::ConfigMenu),
    InstallMenu(main_menu::InstallMenu),
    NginxMenu(nginx::NginxMenu),
    NginxSites(nginx::NginxSites),
    DbMenu(db::DbMenu),
    DbList(db::DbList),
    PasswordForm(db::PasswordForm),
    PortForm(db::PortForm),
    RedisMenu(redis::RedisMenu),
    PhpMenu(php::PhpMenu),
    PhpVersionMenu(php::PhpVersionMenu),
    PhpPools(php::PhpPools),
    PoolDetail(php::PoolDetail),
    PoolForm(php::PoolForm),
    AppsMenu(apps::AppsMenu),
    AppDetail(apps::AppDetail),
    AppForm(apps::AppForm),
    UsersMenu(users::UsersMenu),
    UserList(users::UserList),
    UserDetail(users::UserDetail),
    UserAddForm(users::UserAddForm),
    GroupList(users::GroupList),
    FirewallMenu(firewall::FirewallMenu),
    FirewallRules(firewall::FirewallRules),
    FirewallPortForm(firewall::FirewallPortForm),
    Toolkit(toolkit::Toolkit),
    Exec(exec::ExecScreen),
    EditorPick(editor::EditorPick),
}

impl Screen {
    pub(crate) fn view(&mut self) -> &mut dyn View {
        match self {
            Screen::Splash(screen) => screen,
            Screen::MainMenu(screen) => screen,
            Screen::ConfigMenu(screen) => screen,
            Screen::InstallMenu(screen) => screen,
            Screen::NginxMenu(screen) => screen,
            Screen::NginxSites(screen) => screen,
            Screen::DbMenu(screen) => screen,
            Screen::DbList(screen) => screen,
            Screen::PasswordForm(screen) => screen,
            Screen::PortForm(screen) => screen,
            Screen::RedisMenu(screen) => screen,
            Screen::PhpMenu(screen) => screen,
            Screen::PhpVersionMenu(screen) => screen,
            Screen::PhpPools(screen) => screen,
            Screen::PoolDetail(screen) => screen,
            Screen::PoolForm(screen) => screen,
            Screen::AppsMenu(screen) => screen,
            Screen::AppDetail(screen) => screen,
            Screen::AppForm(screen) => screen,
            Screen::UsersMenu(screen) => screen,
            Screen::UserList(screen) => screen,
            Screen::UserDetail(screen) => screen,
            Screen::UserAddForm(screen) => screen,
            Screen::GroupList(screen) => screen,
            Screen::FirewallMenu(screen) => screen,
            Screen::FirewallRules(screen) => screen,
            Screen::FirewallPortForm(screen) => screen,
            Screen::Toolkit(screen) => screen,
            Screen::Exec(screen) => screen,
            Screen::EditorPick(screen) => screen,
        }
    }

    pub(crate) fn view_ref(&self) -> &dyn View {
        match self {
            Screen::Splash(screen) => screen,
            Screen::MainMenu(screen) => screen,
            Screen::ConfigMenu(screen) => screen,
            Screen::InstallMenu(screen) => screen,
            Screen::NginxMenu(screen) => screen,
            Screen::NginxSites(screen) => screen,
            Screen::DbMenu(screen) => screen,
            Screen::DbList(screen) => screen,
            Screen::PasswordForm(screen) => screen,
            Screen::PortForm(screen) => screen,
            Screen::RedisMenu(screen) => screen,
            Screen::PhpMenu(screen) => screen,
            Screen::PhpVersionMenu(screen) => screen,
            Screen::PhpPools(screen) => screen,
            Screen::PoolDetail(screen) => screen,
            Screen::PoolForm(screen) => screen,
            Screen::AppsMenu(screen) => screen,
            Screen::AppDetail(screen) => screen,
            Screen::AppForm(screen) => screen,
            Screen::UsersMenu(screen) => screen,
            Screen::UserList(screen) => screen,
            Screen::UserDetail(screen) => screen,
            Screen::UserAddForm(screen) => screen,
            Screen::GroupList(screen) => screen,
            Screen::FirewallMenu(screen) => screen,
            Screen::FirewallRules(screen) => screen,
            Screen::FirewallPortForm(screen) => screen,
            Screen::Toolkit(screen) => screen,
            Screen::Exec(screen) => screen,
            Screen::EditorPick(screen) => screen,
        }
    }
}
